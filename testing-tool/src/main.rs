use anyhow::Result;
use colored::*;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::{self, Write};

#[derive(Debug, Serialize)]
struct RegisterRoute {
    route_id: i32,
    route_name: String,
    load: f64,
    cargo_type: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚚 Route Registry Testing Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    // Paso 1: Pedir la URL del servidor
    let default_url = std::env::var("ROUTE_REGISTRY_URL")
        .unwrap_or_else(|_| "http://localhost:8080".to_string());
    let base_url = prompt_with_default("URL del servidor", &default_url)?;
    let client = Client::new();

    // Paso 2: Menú principal
    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 📝 Registrar ruta");
        println!("2. 🔍 Obtener ruta");
        println!("3. 🗑️  Borrar rutas");
        println!("4. 🚪 Salir");

        let choice = prompt("Selecciona una opción (1-4)")?;

        let result = match choice.as_str() {
            "1" => register_route(&client, &base_url).await,
            "2" => get_route(&client, &base_url).await,
            "3" => delete_routes(&client, &base_url).await,
            "4" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                continue;
            }
        };

        if let Err(e) = result {
            println!("{} {}", "❌ Error:".bright_red().bold(), e);
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", format!("{}: ", label).bright_yellow());
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

fn prompt_with_default(label: &str, default: &str) -> Result<String> {
    let value = prompt(&format!("{} [{}]", label, default))?;
    if value.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(value.trim_end_matches('/').to_string())
    }
}

async fn register_route(client: &Client, base_url: &str) -> Result<()> {
    println!();
    println!("{}", "📝 REGISTRAR RUTA".bright_cyan().bold());

    let payload = RegisterRoute {
        route_id: prompt("route_id")?.parse()?,
        route_name: prompt("route_name")?,
        load: prompt("load")?.parse()?,
        cargo_type: prompt("cargo_type")?,
    };

    println!("{}", "📦 Payload:".bright_blue());
    println!("{}", serde_json::to_string_pretty(&payload)?);

    let response = client
        .post(format!("{}/api/route/register", base_url))
        .json(&payload)
        .send()
        .await?;

    print_response(response).await
}

async fn get_route(client: &Client, base_url: &str) -> Result<()> {
    println!();
    println!("{}", "🔍 OBTENER RUTA".bright_cyan().bold());

    let id = prompt("route_id")?;
    let response = client
        .get(format!("{}/api/route/{}", base_url, id))
        .send()
        .await?;

    if response.status() == StatusCode::GONE {
        println!("{}", "⚠️ La ruta existe pero ya no es vigente (410)".bright_yellow());
    }

    print_response(response).await
}

async fn delete_routes(client: &Client, base_url: &str) -> Result<()> {
    println!();
    println!("{}", "🗑️ BORRAR RUTAS".bright_cyan().bold());

    let raw = prompt("route_ids separados por comas")?;
    let route_ids = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<i32>)
        .collect::<Result<Vec<_>, _>>()?;

    let response = client
        .delete(format!("{}/api/route", base_url))
        .json(&json!({ "route_ids": route_ids }))
        .send()
        .await?;

    if response.status() == StatusCode::ACCEPTED {
        println!("{}", "ℹ️ Borrado aceptado, se ejecuta en segundo plano".bright_blue());
    }

    print_response(response).await
}

async fn print_response(response: Response) -> Result<()> {
    let status = response.status();
    let status_line = format!("📥 Status: {}", status);
    if status.is_success() {
        println!("{}", status_line.bright_green());
    } else {
        println!("{}", status_line.bright_red());
    }

    let text = response.text().await?;
    if text.is_empty() {
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(body) => println!("{}", serde_json::to_string_pretty(&body)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
