use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::Value;

use kedikian_mock_auth::{LoginResponse, UserDirectory, rocket};

async fn client_with(directory: UserDirectory) -> Client {
    Client::tracked(rocket(rocket::Config::figment(), directory))
        .await
        .expect("valid rocket instance")
}

async fn login<'c>(client: &'c Client, body: &str) -> rocket::local::asynchronous::LocalResponse<'c> {
    client
        .post("/api/v1/login")
        .header(ContentType::Form)
        .body(body.to_string())
        .dispatch()
        .await
}

#[rocket::async_test]
async fn test_login_with_default_users() {
    let client = client_with(UserDirectory::default()).await;

    // admin / 123456
    let response = login(&client, "username=YWRtaW4%3D&password=MTIzNDU2").await;
    assert_eq!(response.status(), Status::Ok);
    let body: LoginResponse = response.into_json().await.expect("valid login JSON");
    assert_eq!(body.id, "1");
    assert_eq!(body.nombre_usuario, "admin");
    assert_eq!(body.rol, "administrador");
    assert!(body.token.starts_with("mock_token_admin_"));

    // operario / 123456, with the padding left unescaped as the frontend sends it.
    let response = login(&client, "username=b3BlcmFyaW8=&password=MTIzNDU2").await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.expect("valid login JSON");
    assert_eq!(body["nombreUsuario"], "operario");
    assert_eq!(body["rol"], "operario");
}

#[rocket::async_test]
async fn test_tokens_are_not_reused() {
    let client = client_with(UserDirectory::default()).await;

    let first: LoginResponse = login(&client, "username=YWRtaW4%3D&password=MTIzNDU2")
        .await
        .into_json()
        .await
        .expect("valid login JSON");
    let second: LoginResponse = login(&client, "username=YWRtaW4%3D&password=MTIzNDU2")
        .await
        .into_json()
        .await
        .expect("valid login JSON");
    assert_ne!(first.token, second.token);
}

#[rocket::async_test]
async fn test_wrong_password_is_401() {
    let client = client_with(UserDirectory::default()).await;

    // admin / 654321
    let response = login(&client, "username=YWRtaW4%3D&password=NjU0MzIx").await;
    assert_eq!(response.status(), Status::Unauthorized);
    let body: Value = response.into_json().await.expect("valid error JSON");
    assert_eq!(body["detail"], "Incorrect username or password");

    // No fields at all decode to empty credentials.
    let response = login(&client, "").await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[rocket::async_test]
async fn test_malformed_base64_is_400() {
    let client = client_with(UserDirectory::default()).await;

    let response = login(&client, "username=%25%25%25&password=MTIzNDU2").await;
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().await.expect("valid error JSON");
    assert!(body["detail"].as_str().unwrap().contains("username"));

    // Valid base64 of a lone 0xff byte, which is not UTF-8.
    let response = login(&client, "username=YWRtaW4%3D&password=%2Fw%3D%3D").await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_directory_is_passed_in() {
    let directory = UserDirectory::new().with_user("capataz", "obra2026", "supervisor");
    let client = client_with(directory).await;

    // capataz / obra2026
    let response = login(&client, "username=Y2FwYXRheg%3D%3D&password=b2JyYTIwMjY%3D").await;
    assert_eq!(response.status(), Status::Ok);
    let body: LoginResponse = response.into_json().await.expect("valid login JSON");
    assert_eq!(body.rol, "supervisor");

    // The default users are not there.
    let response = login(&client, "username=YWRtaW4%3D&password=MTIzNDU2").await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[rocket::async_test]
async fn test_index_and_docs() {
    let client = client_with(UserDirectory::default()).await;

    let response = client.get("/").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.expect("valid JSON");
    assert_eq!(body["endpoints"]["login"], "/api/v1/login");

    let response = client.get("/docs").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::HTML));
    let html = response.into_string().await.expect("HTML body");
    assert!(html.contains("admin"));
    assert!(html.contains("operario"));
    assert!(!html.contains("123456"));
}

#[rocket::async_test]
async fn test_docs_escape_user_fields() {
    let directory = UserDirectory::new().with_user("<script>x</script>", "pw", "a&b");
    let client = client_with(directory).await;

    let html = client
        .get("/docs")
        .dispatch()
        .await
        .into_string()
        .await
        .expect("HTML body");
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("a&amp;b"));
}

#[rocket::async_test]
async fn test_cors_headers() {
    let client = client_with(UserDirectory::default()).await;

    let response = client
        .post("/api/v1/login")
        .header(ContentType::Form)
        .header(Header::new("Origin", "http://localhost:4200"))
        .body("username=YWRtaW4%3D&password=MTIzNDU2")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    assert!(response.headers().get_one("Access-Control-Allow-Origin").is_some());

    let response = client
        .options("/api/v1/login")
        .header(Header::new("Origin", "http://localhost:4200"))
        .header(Header::new("Access-Control-Request-Method", "POST"))
        .dispatch()
        .await;
    assert!(response.status().class().is_success());
    assert!(response.headers().get_one("Access-Control-Allow-Origin").is_some());
}
