//! Both flows against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the List and Submit
//! flows over real HTTP using ureq as the host. Checks that request building,
//! response parsing and the state machines agree with the actual server.

use fax_core::render::{render_fax_form, render_fax_list, render_page, EMPTY_LIST_MESSAGE, ERROR_MESSAGE};
use fax_core::{
    init_client, ApiError, ClientConfig, ClientHandle, DraftField, FaxForm, FetchState, HttpRequest,
    HttpResponse, ListFlow, RefetchOptions, Resolution, SubmitFlow, ValidationError,
};
use mock_server::ServerConfig;

const API_KEY: &str = "s3cret";

/// Execute an `HttpRequest` using ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses come back as data; only transport failures are `Err`.
fn execute(req: &HttpRequest) -> Result<HttpResponse, String> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut builder = agent.post(&req.url);
    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let mut response = builder.send(req.body.as_bytes()).map_err(|e| e.to_string())?;

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body,
    })
}

/// Start the mock server on a random port and return its GraphQL URL.
fn start_server(api_key: Option<&str>) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();
    let config = ServerConfig {
        port: addr.port(),
        api_key: api_key.map(str::to_string),
    };

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with(listener, &config).await
        })
        .unwrap();
    });

    format!("http://{addr}/graphql")
}

fn load_list(flow: &mut ListFlow<'_>, options: RefetchOptions) -> Resolution {
    match flow.refetch(options).unwrap() {
        Some(pending) => match execute(&pending.request) {
            Ok(response) => flow.resolve(pending.token, response),
            Err(reason) => flow.fail(pending.token, reason),
        },
        None => Resolution::Applied,
    }
}

fn submit_form(flow: &mut SubmitFlow<'_>, form: &FaxForm) -> Result<Resolution, ValidationError> {
    let pending = form.on_submit(|draft| flow.submit(draft))?.unwrap();
    Ok(match execute(&pending.request) {
        Ok(response) => flow.resolve(pending.token, response),
        Err(reason) => flow.fail(pending.token, reason),
    })
}

#[test]
fn list_and_submit_lifecycle() {
    let url = start_server(Some(API_KEY));
    let client: ClientHandle = init_client(ClientConfig::new(url, Some(API_KEY.to_string())));

    // Step 1: mount the list; the server starts empty.
    let mut list = ListFlow::new(&client);
    let pending = list.mount().unwrap().expect("fresh client has no cache");
    let response = execute(&pending.request).unwrap();
    assert_eq!(list.resolve(pending.token, response), Resolution::Applied);
    assert_eq!(list.current_state(), &FetchState::Loaded(Vec::new()));
    assert!(render_fax_list(list.current_state()).contains(EMPTY_LIST_MESSAGE));

    // Step 2: an incomplete form never reaches the network.
    let mut submit = SubmitFlow::new(&client);
    let mut form = FaxForm::new();
    form.handle_change(DraftField::From, "+15551234567");
    form.handle_change(DraftField::MediaUrl, "https://x/y.pdf");
    let err = submit_form(&mut submit, &form).unwrap_err();
    assert_eq!(err, ValidationError::EmptyFields(vec![DraftField::To]));
    assert!(submit.current_state().is_none());

    // Step 3: complete the form and send.
    form.handle_named_change("to", "+15557654321").unwrap();
    assert_eq!(submit_form(&mut submit, &form).unwrap(), Resolution::Applied);
    let sent = submit
        .current_state()
        .and_then(FetchState::data)
        .cloned()
        .expect("sendFax resolved");
    assert_eq!(sent.to, "+15557654321");
    assert_eq!(form.draft().to, "+15557654321", "form is not cleared");

    // Step 4: the mounted list did not refetch on its own.
    assert_eq!(list.current_state(), &FetchState::Loaded(Vec::new()));

    // Step 5: reload bypassing the cache picks up the new fax.
    load_list(&mut list, RefetchOptions { skip_cache: true });
    let faxes = list.current_state().data().unwrap();
    assert_eq!(faxes, &vec![sent.clone()]);

    // Step 6: the rendered page links to the media.
    let page = render_page(
        &render_fax_list(list.current_state()),
        &render_fax_form(submit.current_state(), &form),
    );
    assert!(page.contains(&format!("data-sid=\"{}\"", sent.sid)));
    assert!(page.contains("href=\"https://x/y.pdf\""));
}

#[test]
fn wrong_token_renders_generic_error() {
    let url = start_server(Some(API_KEY));
    let client = init_client(ClientConfig::new(url, Some("wrong".to_string())));

    let mut list = ListFlow::new(&client);
    load_list(&mut list, RefetchOptions::default());
    assert!(matches!(
        list.current_state(),
        FetchState::Errored(ApiError::Http { status: 401, .. })
    ));
    let html = render_fax_list(list.current_state());
    assert!(html.contains(ERROR_MESSAGE));
    assert!(!html.contains("unauthorized"));
}

#[test]
fn missing_token_still_sends_request() {
    let url = start_server(None);
    let client = init_client(ClientConfig::new(url, None));

    let mut list = ListFlow::new(&client);
    load_list(&mut list, RefetchOptions::default());
    assert_eq!(list.current_state(), &FetchState::Loaded(Vec::new()));
}

#[test]
fn unreachable_server_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = init_client(ClientConfig::new(format!("http://127.0.0.1:{port}/graphql"), None));

    let mut list = ListFlow::new(&client);
    load_list(&mut list, RefetchOptions::default());
    assert!(matches!(
        list.current_state(),
        FetchState::Errored(ApiError::Transport(_))
    ));
}
