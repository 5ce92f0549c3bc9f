//! Development stand-in for the Kedikian login endpoint.
//!
//! The frontend posts base64-encoded credentials as a form and expects a
//! user record with a token back. Users come from a [`UserDirectory`]
//! handed to [`rocket`]; nothing is persisted.

#[macro_use]
extern crate rocket;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::figment::providers::{Env, Format, Serialized, Toml};
use rocket::form::Form;
use rocket::http::{RawStr, Status};
use rocket::request::Request;
use rocket::response::content::RawHtml;
use rocket::response::status::Custom;
use rocket::serde::json::{Json, Value, json};
use rocket::{Build, Rocket, State};
use rocket_cors::CorsOptions;
use serde::{Deserialize, Serialize};

/// A login the mock server accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct MockUser {
    pub id: String,
    pub nombre_usuario: String,
    pub password: String,
    pub rol: String,
}

/// The accounts known to the server, kept as Rocket managed state.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<MockUser>,
}

impl UserDirectory {
    pub fn new() -> Self {
        UserDirectory { users: Vec::new() }
    }

    /// Adds a user; ids are assigned in insertion order starting at 1.
    pub fn with_user(mut self, nombre_usuario: &str, password: &str, rol: &str) -> Self {
        let id = (self.users.len() + 1).to_string();
        self.users.push(MockUser {
            id,
            nombre_usuario: nombre_usuario.to_string(),
            password: password.to_string(),
            rol: rol.to_string(),
        });
        self
    }

    pub fn users(&self) -> &[MockUser] {
        &self.users
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Option<&MockUser> {
        self.users
            .iter()
            .find(|u| u.nombre_usuario == username && u.password == password)
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        UserDirectory::new()
            .with_user("admin", "123456", "administrador")
            .with_user("operario", "123456", "operario")
    }
}

/// Form body of `POST /api/v1/login`. Both fields are base64.
#[derive(FromForm)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: String,
    #[serde(rename = "nombreUsuario")]
    pub nombre_usuario: String,
    pub rol: String,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Detail {
    pub detail: String,
}

fn detail(status: Status, message: impl Into<String>) -> Custom<Json<Detail>> {
    Custom(status, Json(Detail { detail: message.into() }))
}

/// Decodes one base64 form field into text.
///
/// Form decoding turns an unescaped `+` into a space, which base64 never
/// contains, so spaces are mapped back first.
fn decode_field(name: &str, raw: Option<&str>) -> Result<String, Custom<Json<Detail>>> {
    let raw = raw.unwrap_or_default().replace(' ', "+");
    let bytes = STANDARD
        .decode(raw.as_bytes())
        .map_err(|e| detail(Status::BadRequest, format!("{} is not valid base64: {}", name, e)))?;
    String::from_utf8(bytes)
        .map_err(|_| detail(Status::BadRequest, format!("{} is not valid UTF-8", name)))
}

/// Mock Login endpoint.
///
/// - **URL:** `/api/v1/login`
/// - **Method:** `POST`
/// - **Content-Type:** `application/x-www-form-urlencoded`
///
/// ```text
/// username=YWRtaW4=&password=MTIzNDU2
/// ```
///
/// Answers 200 with `{id, nombreUsuario, rol, token}`, 401 for unknown
/// credentials and 400 when a field does not decode.
#[post("/api/v1/login", data = "<form>")]
pub fn login(
    form: Form<LoginForm>,
    directory: &State<UserDirectory>,
) -> Result<Json<LoginResponse>, Custom<Json<Detail>>> {
    let username = decode_field("username", form.username.as_deref())?;
    let password = decode_field("password", form.password.as_deref())?;

    match directory.authenticate(&username, &password) {
        Some(user) => {
            info!("[mock-auth] Login succeeded for {}", user.nombre_usuario);
            Ok(Json(LoginResponse {
                id: user.id.clone(),
                nombre_usuario: user.nombre_usuario.clone(),
                rol: user.rol.clone(),
                token: format!("mock_token_{}_{}", user.nombre_usuario, uuid::Uuid::new_v4().simple()),
            }))
        }
        None => {
            warn!("[mock-auth] Login failed for {}", username);
            Err(detail(Status::Unauthorized, "Incorrect username or password"))
        }
    }
}

#[get("/")]
pub fn index() -> Json<Value> {
    Json(json!({
        "message": "Kedikian mock backend running",
        "endpoints": {
            "login": "/api/v1/login",
            "docs": "/docs"
        }
    }))
}

#[get("/docs")]
pub fn docs(directory: &State<UserDirectory>) -> RawHtml<String> {
    let users: String = directory
        .users()
        .iter()
        .map(|u| {
            format!(
                "<li><strong>{}</strong> (rol: {})</li>",
                RawStr::new(&u.nombre_usuario).html_escape(),
                RawStr::new(&u.rol).html_escape()
            )
        })
        .collect();

    RawHtml(format!(
        r#"<html>
<head><title>Kedikian mock backend</title></head>
<body>
<h1>Kedikian mock backend</h1>
<h2>Endpoints</h2>
<ul>
<li><strong>POST /api/v1/login</strong> - form login, base64 username and password</li>
<li><strong>GET /</strong> - server information</li>
</ul>
<h2>Users</h2>
<ul>{}</ul>
<h2>Request</h2>
<pre>
POST /api/v1/login
Content-Type: application/x-www-form-urlencoded

username=YWRtaW4=&amp;password=MTIzNDU2
</pre>
</body>
</html>"#,
        users
    ))
}

/// Answers any preflight request; the CORS fairing adds the headers.
#[options("/<_..>")]
pub fn preflight() -> Status {
    Status::NoContent
}

#[catch(default)]
fn default_catcher(status: Status, _req: &Request) -> Json<Detail> {
    Json(Detail {
        detail: status.reason().unwrap_or("Unknown Error").to_string(),
    })
}

pub const DEFAULT_PORT: u16 = 8000;

/// Server configuration: bind `0.0.0.0:8000` unless `Rocket.toml` or a
/// `ROCKET_*` variable says otherwise. An explicit `port` wins over both.
pub fn figment(port: Option<u16>) -> Figment {
    layered_figment("ROCKET_", port)
}

fn layered_figment(env_prefix: &str, port: Option<u16>) -> Figment {
    let figment = Figment::from(rocket::Config::default())
        .merge(("address", "0.0.0.0"))
        .merge(("port", DEFAULT_PORT))
        .merge(Toml::file("Rocket.toml").nested())
        .merge(Env::prefixed(env_prefix).global());
    match port {
        Some(port) => figment.merge(Serialized::global("port", port)),
        None => figment,
    }
}

/// Builds the server from `figment` with `directory` as its user table.
pub fn rocket(figment: Figment, directory: UserDirectory) -> Rocket<Build> {
    let cors = CorsOptions::default()
        .to_cors()
        .expect("default CORS options are valid");

    let names = directory
        .users()
        .iter()
        .map(|u| u.nombre_usuario.clone())
        .collect::<Vec<_>>()
        .join(", ");

    rocket::custom(figment)
        .manage(directory)
        .attach(cors)
        .attach(AdHoc::on_liftoff("Mock user summary", move |_| {
            Box::pin(async move {
                info!("[mock-auth] Configured users: {}", names);
            })
        }))
        .mount("/", routes![index, docs, login, preflight])
        .register("/", catchers![default_catcher])
}
