use finqa_client::{ApiClient, ChatClient, ChatService, ClientError, DocumentService, UploadClient};
use finqa_core::{DocumentFile, Message, SessionIdentity};
use mockito::{Matcher, Server};
use serde_json::json;

fn pdf() -> DocumentFile {
    DocumentFile::new("report.pdf", "application/pdf", b"%PDF-1.7 fake".to_vec())
}

#[tokio::test]
async fn test_ask_posts_question_and_parses_answer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "question": "What was revenue?",
            "chat_history": []
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "answer": "<answer>$4.2M</answer>",
                "sources": [{"content": "Revenue: $4.2M", "page": 2, "score": 0.91}],
                "processing_time": 0.75
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = ChatClient::new(ApiClient::new(&server.url()).unwrap());
    let outcome = client.ask("What was revenue?", &[]).await.unwrap();

    assert_eq!(outcome.answer, "<answer>$4.2M</answer>");
    assert_eq!(outcome.sources.len(), 1);
    assert_eq!(outcome.sources[0].page, 2);
    assert_eq!(outcome.processing_time_ms, 750);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_ask_sends_prior_turns_as_history() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"question": "And profit?"})),
            Matcher::Regex(r#""type":"assistant""#.to_string()),
            Matcher::Regex(r#""content":"What was revenue\?""#.to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"answer": "Profit was $1M", "sources": [], "processing_time": 1.0}"#)
        .create_async()
        .await;

    let history = vec![
        Message::user("What was revenue?"),
        Message::assistant("$4.2M", Vec::new()),
    ];
    let client = ChatClient::new(ApiClient::new(&server.url()).unwrap());
    let outcome = client.ask("And profit?", &history).await.unwrap();

    assert_eq!(outcome.answer, "Profit was $1M");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_ask_maps_non_2xx_to_server_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/chat")
        .with_status(500)
        .with_body(r#"{"detail": "vector store unavailable"}"#)
        .create_async()
        .await;

    let client = ChatClient::new(ApiClient::new(&server.url()).unwrap());
    let err = client.ask("Anything?", &[]).await.unwrap_err();

    assert_eq!(
        err,
        ClientError::Server { status: 500, message: Some("vector store unavailable".to_string()) }
    );
}

#[tokio::test]
async fn test_ask_maps_undecodable_body_to_network_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body("null")
        .create_async()
        .await;

    let client = ChatClient::new(ApiClient::new(&server.url()).unwrap());
    let err = client.ask("Anything?", &[]).await.unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let client = ChatClient::new(ApiClient::new("http://127.0.0.1:1").unwrap());
    let err = client.ask("Anything?", &[]).await.unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn test_cleanup_sends_identity() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", Matcher::Regex(r"^/api/cleanup".to_string()))
        .match_query(Matcher::UrlEncoded("user_id".into(), "42".into()))
        .with_status(200)
        .with_body(r#"{"status": "ok"}"#)
        .create_async()
        .await;

    let client = ChatClient::new(ApiClient::new(&server.url()).unwrap());
    client.cleanup(&SessionIdentity::new("42")).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_cleanup_failure_is_reported() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", Matcher::Regex(r"^/api/cleanup".to_string()))
        .with_status(404)
        .create_async()
        .await;

    let client = ChatClient::new(ApiClient::new(&server.url()).unwrap());
    let err = client.cleanup(&SessionIdentity::new("42")).await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 404, .. }));
}

#[tokio::test]
async fn test_upload_sends_multipart_file() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Regex(r"^/api/upload".to_string()))
        .match_query(Matcher::UrlEncoded("user_id".into(), "7".into()))
        .match_header("content-type", Matcher::Regex("^multipart/form-data; boundary=".to_string()))
        .match_body(Matcher::Regex(r#"name="file"; filename="report.pdf""#.to_string()))
        .with_status(200)
        .with_body(
            json!({
                "message": "ok",
                "filename": "report.pdf",
                "chunks_count": 5,
                "processing_time": 1.2
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = UploadClient::new(ApiClient::new(&server.url()).unwrap());
    let outcome = client.upload(&pdf(), &SessionIdentity::new("7")).await.unwrap();

    assert_eq!(outcome.message, "ok");
    assert_eq!(outcome.filename, "report.pdf");
    assert_eq!(outcome.chunks_count, 5);
    assert_eq!(outcome.processing_time_ms, 1200);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_is_attempted_once() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Regex(r"^/api/upload".to_string()))
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let client = UploadClient::new(ApiClient::new(&server.url()).unwrap());
    let err = client.upload(&pdf(), &SessionIdentity::new("7")).await.unwrap_err();

    assert_eq!(err, ClientError::Server { status: 503, message: None });
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_documents() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/documents/7")
        .with_status(200)
        .with_body(
            json!({
                "documents": [
                    {
                        "filename": "report.pdf",
                        "upload_date": "2024-03-01",
                        "chunks_count": 12,
                        "status": "processed"
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = UploadClient::new(ApiClient::new(&server.url()).unwrap());
    let documents = client.list_documents(&SessionIdentity::new("7")).await.unwrap();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].filename, "report.pdf");
    assert_eq!(documents[0].chunks_count, 12);
    assert_eq!(documents[0].status.as_deref(), Some("processed"));
}

#[tokio::test]
async fn test_health_check() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/")
        .with_status(200)
        .with_body(r#"{"message": "RAG-based Financial Statement Q&A System is running"}"#)
        .create_async()
        .await;

    let api = ApiClient::new(&server.url()).unwrap();
    assert!(api.health_check().await);
    assert!(api.health().await.unwrap().contains("running"));

    let offline = ApiClient::new("http://127.0.0.1:1").unwrap();
    assert!(!offline.health_check().await);
}
