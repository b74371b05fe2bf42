use std::{collections::HashMap, time::Duration};

use tokio::{io::AsyncReadExt, net::TcpListener};

use crate::{ArcStr, config::{Config, Data, USizeOpt}, log::Log, net::Net};

#[tokio::test]
async fn test_mock_returns_canned_body() {
    let url = ArcStr::from("https://example.com/v0/beststories.json");
    let net = Net::mock(HashMap::from([(url.clone(), ArcStr::from("[1,2,3]"))]));

    let body = net.get(url, None).await.unwrap();
    assert_eq!(&*body, "[1,2,3]");
}

#[tokio::test]
async fn test_mock_unknown_url_fails() {
    let net = Net::mock(HashMap::new());

    let err = net
        .get(ArcStr::from("https://example.com/missing"), None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("https://example.com/missing"));
}

#[tokio::test]
async fn test_mock_insert_replaces_body() {
    let url = ArcStr::from("https://example.com/item");
    let net = Net::mock(HashMap::from([(url.clone(), ArcStr::from("old"))]));
    let Net::Mock(mock) = &net else {
        unreachable!()
    };

    mock.insert(url.clone(), ArcStr::from("new")).await;
    assert_eq!(&*net.get(url, None).await.unwrap(), "new");
}

#[tokio::test]
async fn test_actual_connection_failure_names_url() {
    let config = Config::mock(Data::default());
    config.set_usize(USizeOpt::Timeout, 2).await;
    let net = Net::spawn(config, Log::mock()).await.unwrap();

    let url = ArcStr::from("http://127.0.0.1:1/v0/beststories.json");
    let err = net.get(url, None).await.unwrap_err();
    assert!(format!("{err:#}").contains("http://127.0.0.1:1/v0/beststories.json"));
}

#[tokio::test]
async fn test_dropped_request_closes_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = ArcStr::from(format!(
        "http://{}/v0/beststories.json",
        listener.local_addr().unwrap()
    ));
    let net = Net::spawn(Config::mock(Data::default()), Log::mock())
        .await
        .unwrap();

    let request = tokio::spawn(async move { net.get(url, None).await });
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut buf = [0u8; 1024];
    assert!(socket.read(&mut buf).await.unwrap() > 0);
    request.abort();

    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
        }
    })
    .await;
    assert!(closed.is_ok());
}
