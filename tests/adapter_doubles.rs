//! In-process doubles exercising the broker's ordering and failure contracts without a
//! network: a scripted transport that records every outbound call and a store wrapper
//! that records every persistence event into the same log.

// std
use std::{
	collections::VecDeque,
	sync::{Arc, Mutex},
};
// self
use oauth1_broker::{
	auth::{Credential, RequestToken},
	error::{Error, TransportError},
	flows::{Broker, ConsentSurface},
	http::{ApiFuture, ApiHttpClient, ApiRequest, ApiResponse, HttpMethod},
	oauth::Oauth1Client,
	provider::{ProviderDescriptor, ProviderId},
	store::{CredentialStore, MemoryStore, StoreFuture},
	url::Url,
};

type CallLog = Arc<Mutex<Vec<String>>>;

#[derive(Clone, Default)]
struct ScriptedHttpClient {
	responses: Arc<Mutex<VecDeque<Result<ApiResponse, TransportError>>>>,
	log: CallLog,
}
impl ScriptedHttpClient {
	fn push(&self, response: Result<ApiResponse, TransportError>) {
		self.responses.lock().expect("Response script lock should not be poisoned.").push_back(response);
	}
}
impl ApiHttpClient for ScriptedHttpClient {
	fn execute(&self, request: ApiRequest) -> ApiFuture<'_, ApiResponse> {
		let responses = self.responses.clone();
		let log = self.log.clone();

		Box::pin(async move {
			log.lock().expect("Call log lock should not be poisoned.").push(format!(
				"{} {} signed={}",
				request.method,
				request.url.path(),
				request.authorization.is_some()
			));

			responses
				.lock()
				.expect("Response script lock should not be poisoned.")
				.pop_front()
				.expect("Transport double received more calls than were scripted.")
		})
	}
}

struct RecordingStore {
	inner: MemoryStore,
	log: CallLog,
}
impl RecordingStore {
	fn new(log: CallLog) -> Self {
		Self { inner: MemoryStore::default(), log }
	}

	fn record(&self, event: &str) {
		self.log.lock().expect("Call log lock should not be poisoned.").push(event.into());
	}
}
impl CredentialStore for RecordingStore {
	fn load_credential(&self) -> StoreFuture<'_, Option<Credential>> {
		self.record("load_credential");

		self.inner.load_credential()
	}

	fn save_credential(&self, credential: Credential) -> StoreFuture<'_, ()> {
		self.record("save_credential");

		self.inner.save_credential(credential)
	}

	fn load_display_name(&self) -> StoreFuture<'_, String> {
		self.record("load_display_name");

		self.inner.load_display_name()
	}

	fn save_display_name(&self, name: String) -> StoreFuture<'_, ()> {
		self.record("save_display_name");

		self.inner.save_display_name(name)
	}
}

#[derive(Default)]
struct RecordingSurface(Mutex<Vec<Url>>);
impl ConsentSurface for RecordingSurface {
	fn render(&self, authorize_url: &Url) {
		self.0
			.lock()
			.expect("Surface lock should not be poisoned.")
			.push(authorize_url.clone());
	}
}

struct Rig {
	broker: Broker<ScriptedHttpClient>,
	transport: ScriptedHttpClient,
	snapshots: MemoryStore,
	log: CallLog,
}

fn build_rig() -> Rig {
	let log = CallLog::default();
	let transport = ScriptedHttpClient { responses: Default::default(), log: log.clone() };
	let store = RecordingStore::new(log.clone());
	let snapshots = store.inner.clone();
	let descriptor = descriptor();
	let client = Oauth1Client::new("consumer-key", "consumer-secret");
	let broker = Broker::with_http_client(
		Arc::new(store) as Arc<dyn CredentialStore>,
		descriptor,
		client,
		transport.clone(),
	);

	Rig { broker, transport, snapshots, log }
}

fn descriptor() -> ProviderDescriptor {
	let id = ProviderId::new("scripted").expect("Provider identifier fixture should be valid.");

	ProviderDescriptor::builder(id)
		.request_token_endpoint(parse("https://provider.test/oauth/request_token"))
		.authorization_endpoint(parse("https://provider.test/oauth/authorize"))
		.access_token_endpoint(parse("https://provider.test/oauth/access_token"))
		.user_details_endpoint(parse("https://provider.test/api/0.6/user/details"))
		.build()
		.expect("Descriptor fixture should build.")
}

fn parse(value: &str) -> Url {
	Url::parse(value).expect("URL fixture should parse.")
}

fn form_response(body: &str) -> ApiResponse {
	ApiResponse { status: 200, body: body.as_bytes().to_vec() }
}

fn events(log: &CallLog) -> Vec<String> {
	log.lock().expect("Call log lock should not be poisoned.").clone()
}

#[tokio::test]
async fn finish_persists_the_credential_before_the_profile_lookup() {
	let rig = build_rig();

	rig.broker.client().store_request_token(RequestToken::new("req-tok", "req-sec"));
	rig.transport.push(Ok(form_response("oauth_token=acc-tok&oauth_token_secret=acc-sec")));
	rig.transport.push(Ok(ApiResponse {
		status: 200,
		body: b"<osm><user display_name=\"Alice\"/></osm>".to_vec(),
	}));

	let outcome = rig
		.broker
		.finish_authorization("verifier-code")
		.await
		.expect("Verifier exchange should succeed.");

	assert_eq!(outcome.display_name, "Alice");

	let events = events(&rig.log);
	let persisted_at = events
		.iter()
		.position(|event| event == "save_credential")
		.expect("The credential must be persisted.");
	let profile_at = events
		.iter()
		.position(|event| event.starts_with("GET /api/0.6/user/details"))
		.expect("The profile endpoint must be called.");

	assert!(
		persisted_at < profile_at,
		"Credential persistence must happen before the profile lookup: {events:?}"
	);
	assert_eq!(rig.snapshots.snapshot().display_name, "Alice");
}

#[tokio::test]
async fn profile_failure_keeps_the_persisted_credential() {
	let rig = build_rig();

	rig.broker.client().store_request_token(RequestToken::new("req-tok", "req-sec"));
	rig.transport.push(Ok(form_response("oauth_token=acc-tok&oauth_token_secret=acc-sec")));
	rig.transport.push(Err(TransportError::network(std::io::Error::other("wire cut"))));

	let outcome = rig
		.broker
		.finish_authorization("verifier-code")
		.await
		.expect("A profile failure must not fail the handshake.");

	assert_eq!(outcome.credential.token(), "acc-tok");
	assert_eq!(outcome.display_name, "");
	assert!(rig.broker.is_authorized());

	let snapshot = rig.snapshots.snapshot();

	assert_eq!(snapshot.access_token, "acc-tok");
	assert_eq!(snapshot.access_token_secret, "acc-sec");
	assert_eq!(snapshot.display_name, "");
	assert!(
		events(&rig.log).iter().any(|event| event == "save_display_name"),
		"The empty display name is still persisted."
	);
}

#[tokio::test]
async fn begin_renders_the_url_derived_from_the_request_token() {
	let rig = build_rig();
	let surface = RecordingSurface::default();

	rig.transport
		.push(Ok(form_response("oauth_token=tok-777&oauth_token_secret=sec-777")));

	let session = rig
		.broker
		.begin_authorization(&surface)
		.await
		.expect("Authorization attempt should start successfully.");

	let expected = parse("https://provider.test/oauth/authorize?oauth_token=tok-777");
	let rendered = surface.0.lock().expect("Surface lock should not be poisoned.").clone();

	assert_eq!(session.authorize_url, expected);
	assert_eq!(rendered, vec![expected]);
}

#[tokio::test]
async fn request_helpers_sign_exactly_when_asked() {
	let rig = build_rig();
	let url = parse("https://provider.test/api/0.6/notes");
	let err = rig
		.broker
		.signed_request(HttpMethod::Get, url.clone(), None)
		.await
		.expect_err("Signing without a credential must fail.");

	assert!(matches!(err, Error::NotAuthorized));
	assert!(events(&rig.log).is_empty(), "No call may leave the broker unsigned-by-accident.");

	rig.broker.client().set_access_token(Some(
		Credential::new("acc-tok", "acc-sec").expect("Credential fixture should be valid."),
	));
	rig.transport.push(Ok(ApiResponse { status: 200, body: Vec::new() }));
	rig.transport.push(Ok(ApiResponse { status: 200, body: Vec::new() }));

	rig.broker
		.signed_request(HttpMethod::Get, url.clone(), None)
		.await
		.expect("Signed request should succeed.");
	rig.broker
		.unsigned_request(HttpMethod::Post, url, Some(b"<osm/>".to_vec()))
		.await
		.expect("Unsigned request should succeed.");

	let events = events(&rig.log);

	assert_eq!(events, vec![
		"GET /api/0.6/notes signed=true".to_owned(),
		"POST /api/0.6/notes signed=false".to_owned(),
	]);
}
