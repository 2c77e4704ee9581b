// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! NoteX server binary.

use std::path::PathBuf;

use clap::Parser;
use notex_server::{create_app_state, create_router};
use notex_server_config::{load_config, load_config_with_file, LogFormat};
use notex_server_db::{create_pool, run_migrations};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// NoteX server - accounts, sessions and note image capabilities.
#[derive(Parser, Debug)]
#[command(
	name = "notex-server",
	about = "NoteX identity and capability server",
	version
)]
struct Args {
	/// Config file; defaults to /etc/notex/server.toml.
	#[arg(long, env = "NOTEX_SERVER_CONFIG")]
	config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match args.config {
		Some(path) => load_config_with_file(path)?,
		None => load_config()?,
	};

	let json = config.logging.format == LogFormat::Json;
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(json.then(|| tracing_subscriber::fmt::layer().json()))
		.with((!json).then(tracing_subscriber::fmt::layer))
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		base_url = %config.http.base_url,
		bucket = %config.storage.bucket,
		precedence = %config.auth.credential_precedence,
		"starting notex-server"
	);

	let pool = create_pool(&config.database.url, config.database.max_connections).await?;
	run_migrations(&pool).await?;
	tracing::info!("database migrations complete");

	let state = create_app_state(pool, &config)?;
	let app = create_router(state).layer(TraceLayer::new_for_http()).layer(
		CorsLayer::new()
			.allow_origin(Any)
			.allow_methods(Any)
			.allow_headers(Any),
	);

	let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
	tracing::info!(addr = %listener.local_addr()?, "listening");

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("received shutdown signal");
		}
	}

	Ok(())
}
