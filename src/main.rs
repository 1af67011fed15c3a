#![allow(non_snake_case)]

use dioxus::prelude::*;

mod browser;
mod catalog;
mod catalog_ui;
mod components;
mod config;
mod data;
mod left_nav;
mod pagination;
mod payload_adapter;
mod resource;
mod selection;

use browser::Browser;
use catalog::Client;
use catalog_ui::EndpointBar;
use components::{TableView, dispatch};
use config::AppConfig;
use left_nav::LeftNavigationPane;

fn main() {
    dioxus_logger::init(tracing::Level::INFO).expect("failed to init logger");

    dioxus::launch(App);
}

fn App() -> Element {
    let config = use_signal(AppConfig::load_or_default);
    let mut browser = use_signal(|| Browser::new(&config.peek()));
    let client = use_context_provider(Client::default);
    let mut nav_pane_collapsed = use_signal(|| false);

    // Kick off the databases fetch for the starting endpoint
    use_hook(move || {
        log::info!("Starting at endpoint {}", browser.peek().selection().endpoint());
        let pending = browser.with_mut(|b| b.sync());
        dispatch(browser, &client, pending);
    });

    rsx! {
        div {
            class: "h-screen flex flex-col bg-gray-50",

            // Header
            div {
                class: "bg-white shadow-sm border-b border-gray-200",
                div {
                    class: "px-6 py-3 flex items-start space-x-6",
                    h1 {
                        class: "text-2xl font-bold text-gray-900 pt-1",
                        "🔭 Rowscope"
                    }
                    div {
                        class: "flex-1",
                        EndpointBar { browser, config }
                    }
                }
            }

            div {
                class: "flex-1 flex overflow-hidden",

                LeftNavigationPane {
                    collapsed: nav_pane_collapsed(),
                    browser,
                    on_toggle_collapse: move |_| {
                        nav_pane_collapsed.set(!nav_pane_collapsed());
                    },
                }

                div {
                    class: "flex-1 overflow-y-auto p-6",
                    TableView { browser }
                }
            }
        }

        // Include Tailwind CSS
        style {
            "@import url('https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css');"
        }
    }
}
