use crate::browser::Browser;
use crate::catalog::Client;
use crate::components::dispatch;
use crate::config::AppConfig;
use crate::resource::ResourceState;
use dioxus::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connecting,
    Connected(usize),
    Error(String),
}

impl ConnectionStatus {
    fn from_state(state: &ResourceState<Vec<String>>) -> Self {
        match state {
            ResourceState::Idle | ResourceState::Loading => ConnectionStatus::Connecting,
            ResourceState::Ready(databases) => ConnectionStatus::Connected(databases.len()),
            ResourceState::Errored(e) => ConnectionStatus::Error(e.to_string()),
        }
    }
}

#[component]
pub fn EndpointBar(browser: Signal<Browser>, config: Signal<AppConfig>) -> Element {
    let client = use_context::<Client>();
    let mut draft_url = use_signal(|| browser.peek().selection().endpoint().to_string());
    let mut draft_name = use_signal(String::new);
    let mut save_error = use_signal(|| Option::<String>::None);

    let status = ConnectionStatus::from_state(browser.read().databases_state());
    let saved_endpoints = config.read().saved_endpoints.clone();

    let connect = {
        let client = client.clone();
        move |url: String| {
            draft_url.set(url.clone());
            let pending = browser.with_mut(|b| b.set_endpoint(&url));
            dispatch(browser, &client, pending);
        }
    };

    rsx! {
        div {
            class: "space-y-2",
            div {
                class: "flex items-center space-x-2",
                input {
                    r#type: "url",
                    value: draft_url(),
                    placeholder: "http://127.0.0.1:8001/",
                    oninput: move |evt| draft_url.set(evt.value()),
                    onkeydown: {
                        let mut connect = connect.clone();
                        move |evt: Event<KeyboardData>| {
                            if evt.key() == Key::Enter {
                                connect(draft_url());
                            }
                        }
                    },
                    class: "flex-1 px-3 py-2 border border-gray-300 rounded-md text-sm focus:outline-none focus:ring-2 focus:ring-blue-500"
                }
                button {
                    onclick: {
                        let mut connect = connect.clone();
                        move |_| connect(draft_url())
                    },
                    class: "px-4 py-2 bg-blue-600 text-white text-sm rounded-md hover:bg-blue-700 transition-colors",
                    "Connect"
                }
                button {
                    onclick: {
                        let client = client.clone();
                        move |_| {
                            let pending = browser.with_mut(|b| b.reload());
                            dispatch(browser, &client, pending);
                        }
                    },
                    class: "px-4 py-2 text-sm text-gray-700 bg-gray-100 hover:bg-gray-200 rounded-md transition-colors",
                    "Reload"
                }
                input {
                    r#type: "text",
                    value: draft_name(),
                    placeholder: "Bookmark name",
                    oninput: move |evt| draft_name.set(evt.value()),
                    class: "w-40 px-3 py-2 border border-gray-300 rounded-md text-sm"
                }
                button {
                    onclick: move |_| {
                        let name = draft_name();
                        let url = draft_url();
                        match config.with_mut(|c| c.add_endpoint(&name, &url)) {
                            Ok(()) => {
                                log::info!("Saved endpoint '{}' -> {}", name, url);
                                draft_name.set(String::new());
                                save_error.set(None);
                            }
                            Err(e) => {
                                log::error!("Failed to save endpoint: {}", e);
                                save_error.set(Some(e.to_string()));
                            }
                        }
                    },
                    class: "px-4 py-2 text-sm text-gray-700 bg-gray-100 hover:bg-gray-200 rounded-md transition-colors",
                    "Save"
                }
            }

            if let Some(error) = save_error() {
                p { class: "text-xs text-red-600", "{error}" }
            }

            if !saved_endpoints.is_empty() {
                div {
                    class: "flex flex-wrap gap-2",
                    for endpoint in saved_endpoints {
                        div {
                            key: "{endpoint.name}",
                            class: "flex items-center bg-gray-100 rounded-full pl-3 pr-1 py-1 text-xs",
                            button {
                                onclick: {
                                    let mut connect = connect.clone();
                                    let url = endpoint.url.clone();
                                    move |_| connect(url.clone())
                                },
                                title: "{endpoint.url}",
                                class: "text-gray-800 hover:text-blue-700",
                                "{endpoint.name}"
                            }
                            button {
                                onclick: {
                                    let name = endpoint.name.clone();
                                    move |_| {
                                        if let Err(e) = config.with_mut(|c| c.remove_endpoint(&name)) {
                                            log::error!("Failed to remove endpoint: {}", e);
                                        }
                                    }
                                },
                                class: "ml-1 px-1 text-gray-400 hover:text-red-600",
                                title: "Remove bookmark",
                                "✕"
                            }
                        }
                    }
                }
            }

            ConnectionStatusDisplay { status }
        }
    }
}

#[component]
fn ConnectionStatusDisplay(status: ConnectionStatus) -> Element {
    match status {
        ConnectionStatus::Connecting => rsx! {
            div {
                class: "flex items-center text-sm text-blue-700",
                div {
                    class: "animate-spin rounded-full h-4 w-4 border-b-2 border-blue-600 mr-2"
                }
                "Connecting..."
            }
        },
        ConnectionStatus::Connected(count) => rsx! {
            p {
                class: "text-sm text-green-700",
                "✅ Connected, {count} database(s)"
            }
        },
        ConnectionStatus::Error(error) => rsx! {
            p {
                class: "text-sm text-red-700",
                "Connection failed: {error}"
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FetchError;

    #[test]
    fn test_status_from_state() {
        assert_eq!(
            ConnectionStatus::from_state(&ResourceState::Loading),
            ConnectionStatus::Connecting
        );
        assert_eq!(
            ConnectionStatus::from_state(&ResourceState::Ready(vec!["a".to_string()])),
            ConnectionStatus::Connected(1)
        );
        assert_eq!(
            ConnectionStatus::from_state(&ResourceState::Errored(FetchError::NetworkFailure(
                "refused".to_string()
            ))),
            ConnectionStatus::Error("Network error: refused".to_string())
        );
    }
}
