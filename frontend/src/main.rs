//! Frontend application entry point.

use frontend::app::App;

fn main() {
    #[cfg(not(feature = "server"))]
    dioxus::launch(App);

    #[cfg(feature = "server")]
    dioxus::serve(|| async move {
        use axum::{extract::Request, middleware::Next};
        use dioxus::logger::tracing::debug;
        use dioxus::server::axum;

        Ok(dioxus::server::router(App)
            // we can apply a layer to the entire router using axum's `.layer` method
            .layer(axum::middleware::from_fn(
                |request: Request, next: Next| async move {
                    let path = request.uri().path().to_string();
                    let res = next.run(request).await;
                    debug!(%path, status = %res.status(), "request");
                    res
                },
            )))
    });
}
