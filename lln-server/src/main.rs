use std::env;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, web};

use serde::Deserialize;
use lln_core::config::{self, SimulationConfig};
use lln_core::{CategorySet, Ensemble, Simulation, TheoreticalModel, ValidationError};

/// Default upper bound on trials per request (runs and ensembles alike).
const DEFAULT_MAX_TRIALS: usize = 1_000_000;

/// Default number of runs for `/v1/convergence`.
const DEFAULT_RUNS: usize = 8;

/// Struct representing query parameters for the `/v1/simulate` endpoint
#[derive(Deserialize)]
struct SimulateParams {
	weights: Option<String>, // "verde:4,amarelo:3,vermelho:3"
	trials: Option<String>,
	seed: Option<String>, // integer, or "none"
}

#[derive(Deserialize)]
struct TheoreticalParams {
	weights: Option<String>,
}

#[derive(Deserialize)]
struct ConvergenceParams {
	weights: Option<String>,
	trials: Option<String>,
	runs: Option<usize>,
	seed: Option<String>,
}

/// Read-only server settings, shared by every worker.
#[derive(Clone)]
struct ServerConfig {
	max_trials: usize,
}

impl ServerConfig {
	/// Reads `LLN_MAX_TRIALS`, falling back to the default if unset or invalid.
	fn from_env() -> Self {
		let max_trials = env::var("LLN_MAX_TRIALS")
			.ok()
			.and_then(|v| v.parse().ok())
			.unwrap_or(DEFAULT_MAX_TRIALS);
		Self { max_trials }
	}

	fn check_trials(&self, trials: usize) -> Result<(), ValidationError> {
		if trials > self.max_trials {
			return Err(ValidationError::TooManyTrials { requested: trials, limit: self.max_trials });
		}
		Ok(())
	}
}

impl SimulateParams {
	fn to_config(&self) -> Result<SimulationConfig, ValidationError> {
		SimulationConfig::from_text(self.weights.as_deref(), self.trials.as_deref(), self.seed.as_deref())
	}
}

impl ConvergenceParams {
	fn to_config(&self) -> Result<SimulationConfig, ValidationError> {
		SimulationConfig::from_text(self.weights.as_deref(), self.trials.as_deref(), self.seed.as_deref())
	}
}

fn bad_request(e: ValidationError) -> HttpResponse {
	log::warn!("rejected configuration: {e}");
	HttpResponse::BadRequest().body(e.to_string())
}

/// HTTP GET endpoint `/v1/defaults`
///
/// Returns the configuration used when a query leaves parameters out.
#[get("/v1/defaults")]
async fn get_defaults() -> impl Responder {
	HttpResponse::Ok().json(SimulationConfig::default())
}

/// HTTP GET endpoint `/v1/theoretical`
///
/// Returns the constant probability of each category.
#[get("/v1/theoretical")]
async fn get_theoretical(query: web::Query<TheoreticalParams>) -> impl Responder {
	let pairs = match query.weights.as_deref() {
		Some(s) => match config::parse_categories(s) {
			Ok(p) => p,
			Err(e) => return bad_request(e),
		},
		None => SimulationConfig::default().categories,
	};

	match CategorySet::new(pairs) {
		Ok(set) => HttpResponse::Ok().json(TheoreticalModel::new(&set)),
		Err(e) => bad_request(e),
	}
}

/// HTTP GET endpoint `/v1/simulate`
///
/// Runs one simulation and returns every frequency series with the baseline.
#[get("/v1/simulate")]
async fn get_simulated(settings: web::Data<ServerConfig>, query: web::Query<SimulateParams>) -> impl Responder {
	let simulation = match query.to_config().and_then(|c| Simulation::new(&c)) {
		Ok(s) => s,
		Err(e) => return bad_request(e),
	};
	if let Err(e) = settings.check_trials(simulation.trials()) {
		return bad_request(e);
	}

	match web::block(move || simulation.run()).await {
		Ok(report) => HttpResponse::Ok().json(report),
		Err(e) => HttpResponse::InternalServerError().body(format!("Simulation failed: {e}")),
	}
}

/// HTTP GET endpoint `/v1/convergence`
///
/// Runs `runs` independent simulations (seeds `seed..seed+runs`) and reports
/// how far their final frequencies ended from the theoretical probabilities.
#[get("/v1/convergence")]
async fn get_convergence(settings: web::Data<ServerConfig>, query: web::Query<ConvergenceParams>) -> impl Responder {
	let config = match query.to_config() {
		Ok(c) => c,
		Err(e) => return bad_request(e),
	};
	let runs = query.runs.unwrap_or(DEFAULT_RUNS);

	// The seed fixes the whole ensemble; unseeded requests start from a fresh one
	let ensemble = Simulation::new(&config).and_then(|simulation| {
		settings.check_trials(simulation.trials().saturating_mul(runs))?;
		Ensemble::new(simulation.categories().clone(), simulation.trials(), runs, simulation.seed())
	});
	let ensemble = match ensemble {
		Ok(e) => e,
		Err(e) => return bad_request(e),
	};

	match web::block(move || ensemble.run()).await {
		Ok(report) => HttpResponse::Ok().json(report),
		Err(e) => HttpResponse::InternalServerError().body(format!("Ensemble failed: {e}")),
	}
}

/// Registers every endpoint on an `App`.
fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_defaults)
		.service(get_theoretical)
		.service(get_simulated)
		.service(get_convergence);
}

/// Main entry point for the server.
///
/// Starts an Actix-web HTTP server. Every request carries its own
/// configuration, so no simulation state is shared between requests.
///
/// # Notes
/// - Binds to `LLN_BIND` (default 127.0.0.1:5000).
/// - Logging is controlled with `RUST_LOG`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let bind = env::var("LLN_BIND").unwrap_or_else(|_| "127.0.0.1:5000".to_owned());
	let settings = web::Data::new(ServerConfig::from_env());
	log::info!("listening on {bind} (max {} trials per request)", settings.max_trials);

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET"]))
			.app_data(settings.clone())
			.configure(configure)
	})
		.bind(bind)?
		.run()
		.await
}
