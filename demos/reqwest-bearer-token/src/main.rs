use bearer_connection::{
    http::Method, AuthorizedConnection, Error, FnTokenProvider, RequestSpec, StaticTokenProvider,
    Token,
};
use reqwest::Client;

#[tokio::main]
async fn main() {
    // A token obtained out of band. Any `TokenProvider` works here, for example one that keeps
    // an OAuth2 token refreshed in the background.
    let provider = StaticTokenProvider::new("my-super-secret-token").unwrap();

    // Share one reqwest Client across all calls to reuse pooled connections.
    let connection = AuthorizedConnection::new(provider).with_client(Client::new());

    // GET: parameters are appended to the query string.
    // -> GET https://api.example.com/items?sort=asc&page=2
    let _response = connection
        .perform_request(
            Method::GET,
            "https://api.example.com/items?sort=asc",
            [("page", "2")],
            None,
        )
        .await
        .unwrap();

    // POST without body: parameters are sent as a form.
    let _response = connection
        .perform_request(
            Method::POST,
            "https://api.example.com/items",
            [("name", "widget")],
            None,
        )
        .await
        .unwrap();

    // POST with body: the body is sent verbatim as JSON.
    let spec = RequestSpec::builder()
        .method(Method::POST)
        .url("https://api.example.com/items")
        .body(r#"{"name":"widget"}"#)
        .build();
    let _response = connection.perform(spec).await.unwrap();

    // Callback style: the callback is invoked exactly once, also if no token is available.
    let failing = AuthorizedConnection::new(FnTokenProvider::new(|| async {
        Ok::<Option<Token>, Error>(None)
    }));
    let (tx, rx) = tokio::sync::oneshot::channel();
    failing.perform_with_callback(
        RequestSpec::new(Method::GET, "https://api.example.com/items"),
        move |outcome| {
            let _ = tx.send(outcome.map(|response| response.status()));
        },
    );
    println!("OUTCOME={:?}", rx.await.unwrap());
}
