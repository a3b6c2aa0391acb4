use std::sync::Arc;

use payments_dashboard::run;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
	let config = Arc::new(
		payments_dashboard::infrastructure::config::settings::Config::load()
			.expect("Failed to load configuration"),
	);
	run(config).await
}
