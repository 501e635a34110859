use axum::response::Html;

/// Landing page. Out-of-flow visits to the callback route are redirected
/// here instead of being treated as login attempts.
pub async fn landing() -> Html<&'static str> {
    Html(
        "<h2>mixcli</h2>\
         <p>Run <code>mixcli auth</code> from your terminal to sign in with Spotify.</p>",
    )
}
