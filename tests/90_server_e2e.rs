mod common;

use std::time::Duration;

use anyhow::Result;
use serde_json::{json, Value};

use common::{basic_auth, valid_auth, TestServer, PASSWORD, USER};

const SEED: &str = r#"
persons:
  - name: Ivan
    surname: Petrov
    age: 25
    email: ivan@mail.ru
    telephone: "+79991234567"
  - name: Anna
    surname: Sidorova
    age: 31
    email: anna@mail.ru
    telephone: "+79997654321"
"#;

fn write_seed_file() -> Result<std::path::PathBuf> {
    let name = format!("person-directory-seed-{}.yaml", std::process::id());
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, SEED)?;
    Ok(path)
}

#[tokio::test]
async fn seeded_server_serves_and_guards_writes() -> Result<()> {
    let seed = write_seed_file()?;
    let server = TestServer::spawn(Some(&seed))?;
    server.wait_ready(Duration::from_secs(20)).await?;
    let client = reqwest::Client::new();

    let list: Value = client
        .get(format!("{}/api/v1/persons/list", server.base_url))
        .send()
        .await?
        .json()
        .await?;
    let emails: Vec<&str> = list
        .as_array()
        .expect("list is an array")
        .iter()
        .filter_map(|p| p["email"].as_str())
        .collect();
    assert_eq!(emails, ["ivan@mail.ru", "anna@mail.ru"]);

    let resp = client
        .get(format!("{}/api/v1/persons", server.base_url))
        .query(&[("query", "31")])
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let found: Value = resp.json().await?;
    assert_eq!(found[0]["name"], "Anna");

    let new_person = json!({
        "name": "A",
        "surname": "B",
        "age": 30,
        "email": "a@b.com",
        "telephone": "+71234567890"
    });

    let resp = client
        .post(format!("{}/api/v1/persons", server.base_url))
        .json(&new_person)
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

    let resp = client
        .post(format!("{}/api/v1/persons", server.base_url))
        .header(reqwest::header::AUTHORIZATION, basic_auth(USER, &format!("{}x", PASSWORD)))
        .json(&new_person)
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

    let resp = client
        .post(format!("{}/api/v1/persons", server.base_url))
        .header(reqwest::header::AUTHORIZATION, valid_auth())
        .json(&new_person)
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    let created: Value = resp.json().await?;
    let id = created["id"].as_i64().expect("id is an integer");
    assert!(id > 0);

    let fetched: Value = client
        .get(format!("{}/api/v1/person/{}", server.base_url, id))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(fetched["email"], "a@b.com");

    let resp = client
        .delete(format!("{}/api/v1/person/{}", server.base_url, id))
        .header(reqwest::header::AUTHORIZATION, valid_auth())
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let resp = client
        .get(format!("{}/api/v1/person/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

    let _ = std::fs::remove_file(seed);
    Ok(())
}

#[tokio::test]
async fn health_and_root_describe_the_service() -> Result<()> {
    let server = TestServer::spawn(None)?;
    server.wait_ready(Duration::from_secs(20)).await?;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["database"], "ok");

    let root: Value = client.get(&server.base_url).send().await?.json().await?;
    assert_eq!(root["name"], "Person Directory");
    assert!(root["endpoints"]["create"].is_string());

    let resp = client
        .get(format!("{}/api/v1/persons", server.base_url))
        .query(&[("query", "nobody")])
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = resp.json().await?;
    assert_eq!(body["code"], "not_found");

    Ok(())
}
