//! End-to-end tests over HTTP.
//!
//! Each test serves the full application on an ephemeral port with
//! `PostgreSQL`-backed sessions and drives it like a browser would.
//!
//! Requires `BOOKSHELF_TEST_DATABASE_URL` pointing at a disposable database.

use reqwest::{Client, Response, StatusCode, header};
use serde_json::{Value, json};

use bookshelf_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, client, ensure_admin, register_user, spawn_server, test_pool,
    unique,
};

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION]
        .to_str()
        .expect("ASCII location")
}

async fn login(client: &Client, base_url: &str, identifier: &str, password: &str) -> Response {
    client
        .post(format!("{base_url}/login"))
        .form(&[("email", identifier), ("senha", password)])
        .send()
        .await
        .expect("login request")
}

fn book_json(title: &str) -> Value {
    json!({
        "titulo": title,
        "autor": "Machado de Assis",
        "editora": "Garnier",
        "ano_publicacao": "1899",
        "genero": "Romance",
        "sinopse": "Bentinho e Capitu.",
        "capa_url": "https://example.com/capa.jpg"
    })
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_register_twice_reports_existing_email() {
    let pool = test_pool().await;
    let base_url = spawn_server(pool).await;
    let client = client();
    let name = unique("Ana");
    let email = format!("{name}@bookshelf.test");
    let form = [
        ("nome", name.as_str()),
        ("email", email.as_str()),
        ("senha", "pw"),
        ("tipo", "usuario"),
    ];

    let first = client
        .post(format!("{base_url}/cadastrar"))
        .form(&form)
        .send()
        .await
        .expect("register request");
    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&first), "/login.html?success=cadastrado");

    let second = client
        .post(format!("{base_url}/cadastrar"))
        .form(&form)
        .send()
        .await
        .expect("register request");
    assert_eq!(second.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&second), "/cadastro.html?error=email_existente");
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_standard_user_session_lifecycle() {
    let pool = test_pool().await;
    let (user, password) = register_user(&pool).await;
    let base_url = spawn_server(pool).await;
    let client = client();

    let response = login(&client, &base_url, user.email.as_str(), "wrong").await;
    assert_eq!(location(&response), "/login.html?error=senha_incorreta");

    let response = login(&client, &base_url, user.email.as_str(), &password).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .expect("ASCII cookie");
    assert!(cookie.starts_with("bookshelf_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Expires="));

    let status: Value = client
        .get(format!("{base_url}/api/user"))
        .send()
        .await
        .expect("user request")
        .json()
        .await
        .expect("user json");
    assert_eq!(
        status,
        json!({ "logged": true, "nome": user.name, "tipo": "usuario" })
    );

    let response = client
        .get(format!("{base_url}/api/exemplares"))
        .send()
        .await
        .expect("list request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .post(format!("{base_url}/api/exemplares"))
        .json(&book_json(&unique("Proibido")))
        .send()
        .await
        .expect("create request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .get(format!("{base_url}/logout"))
        .send()
        .await
        .expect("logout request");
    assert_eq!(location(&response), "/login.html");

    let response = client
        .get(format!("{base_url}/api/exemplares"))
        .send()
        .await
        .expect("list request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL"]
async fn test_administrator_manages_catalog() {
    let pool = test_pool().await;
    ensure_admin(&pool).await;
    let base_url = spawn_server(pool).await;
    let client = client();

    let response = login(&client, &base_url, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(location(&response), "/");

    let title = unique("Dom Casmurro");
    let response = client
        .post(format!("{base_url}/api/exemplares"))
        .json(&book_json(&title))
        .send()
        .await
        .expect("create request");
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>().await.expect("json"),
        json!({ "success": true })
    );

    let response = client
        .post(format!("{base_url}/api/exemplares"))
        .json(&book_json(&title))
        .send()
        .await
        .expect("create request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        response.json::<Value>().await.expect("json"),
        json!({ "error": "Título já cadastrado" })
    );

    let books: Vec<Value> = client
        .get(format!("{base_url}/api/exemplares"))
        .send()
        .await
        .expect("list request")
        .json()
        .await
        .expect("list json");
    let id = books
        .iter()
        .find(|b| b["titulo"] == title.as_str())
        .and_then(|b| b["id"].as_i64())
        .expect("created entry is listed");

    let book: Value = client
        .get(format!("{base_url}/api/exemplares/{id}"))
        .send()
        .await
        .expect("get request")
        .json()
        .await
        .expect("get json");
    assert_eq!(book["ano_publicacao"], 1899);

    let mut changed = book_json(&unique("Dom Casmurro ed. revista"));
    changed["ano_publicacao"] = json!(1900);
    let response = client
        .put(format!("{base_url}/api/exemplares/{id}"))
        .json(&changed)
        .send()
        .await
        .expect("update request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .delete(format!("{base_url}/api/exemplares/{id}"))
        .send()
        .await
        .expect("delete request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .delete(format!("{base_url}/api/exemplares/{id}"))
        .send()
        .await
        .expect("delete request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>().await.expect("json"),
        json!({ "error": "Exemplar não encontrado" })
    );
}
