//! Demonstrates submitting a burst of documents through one rate-limited client against a mock
//! registry, showing the third submission waiting for the next window.

// std
use std::time::{Duration, Instant};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use time::macros;
// self
use crpt_registry::{
	client::RegistryClient,
	config::RegistryConfig,
	document::{Description, Document, Product},
	http::ReqwestHttpClient,
	reqwest::Client,
	signature::Signature,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let create_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v3/lk/documents/create").query_param_exists("signature");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"value\":\"3c7e0a51\"}");
		})
		.await;
	let config = RegistryConfig::with_window(2, Duration::from_secs(1))
		.with_endpoint(Url::parse(&server.url("/api/v3/lk/documents/create"))?);
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let client = <RegistryClient<ReqwestHttpClient>>::with_http_client(config, http_client)?;
	let document = Document {
		description: Description { participant_inn: "7701234567".into() },
		doc_id: "demo-doc".into(),
		doc_status: "DRAFT".into(),
		doc_type: "LP_INTRODUCE_GOODS".into(),
		import_request: false,
		owner_inn: "7701234567".into(),
		participant_inn: "7701234567".into(),
		producer_inn: "7707654321".into(),
		production_date: macros::date!(2024-05-20),
		production_type: "OWN_PRODUCTION".into(),
		products: vec![Product {
			certificate_document: "CONFORMITY_CERTIFICATE".into(),
			certificate_document_date: macros::date!(2024-01-15),
			certificate_document_number: "RU-C-0001".into(),
			owner_inn: "7701234567".into(),
			producer_inn: "7707654321".into(),
			production_date: macros::date!(2024-05-19),
			tnved_code: "6403993600".into(),
			uit_code: "0104611111111111211234567".into(),
			uitu_code: "000461111111111111".into(),
		}],
		reg_date: macros::date!(2024-05-21),
		reg_number: "REG-1".into(),
	};
	let signature = Signature::new("demo-detached-signature");
	let start = Instant::now();
	let outcomes = tokio::join!(
		client.submit(&document, &signature),
		client.submit(&document, &signature),
		client.submit(&document, &signature),
	);

	for outcome in [outcomes.0?, outcomes.1?, outcomes.2?] {
		outcome.into_result()?;
	}

	println!("Submitted 3 documents in {:?} with a limit of 2 per second.", start.elapsed());

	create_mock.assert_calls_async(3).await;

	Ok(())
}
