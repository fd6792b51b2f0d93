use axum::Router;
use axum::routing::{get, post};
use std::net::SocketAddr;

/// Serve a fixed smart-HTTP remote at `http://<addr>/repo.git`
///
/// The server runs on its own thread and runtime and lives until the test
/// process exits.
pub fn spawn_remote(advertisement: Vec<u8>, upload_pack: Vec<u8>) -> String {
    let (tx, rx) = std::sync::mpsc::channel::<SocketAddr>();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build test server runtime");

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind test server");
            tx.send(listener.local_addr().expect("no local addr"))
                .expect("Failed to report test server address");

            let app = Router::new()
                .route(
                    "/repo.git/info/refs",
                    get(move || {
                        let body = advertisement.clone();
                        async move { body }
                    }),
                )
                .route(
                    "/repo.git/git-upload-pack",
                    post(move || {
                        let body = upload_pack.clone();
                        async move { body }
                    }),
                );

            axum::serve(listener, app)
                .await
                .expect("Test server failed");
        });
    });

    let addr = rx.recv().expect("Test server did not start");
    format!("http://{addr}/repo.git")
}
