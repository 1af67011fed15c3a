use crate::browser::Browser;
use crate::catalog::Client;
use crate::components::dispatch;
use crate::data::TableReference;
use dioxus::prelude::*;

#[component]
pub fn LeftNavigationPane(
    collapsed: bool,
    browser: Signal<Browser>,
    on_toggle_collapse: EventHandler<()>,
) -> Element {
    let state = browser.read();
    let selection = state.selection();
    let selected_database = selection.database().to_string();
    let selected_table = selection.table().to_string();

    let window = state.window();
    let databases = state.databases().to_vec();
    let databases_loading = window.databases_loading;
    let databases_error = state.databases_error().map(|e| e.to_string());
    let tables = state.tables().to_vec();
    let tables_loading = window.tables_loading;
    let tables_error = state.tables_error().map(|e| e.to_string());

    rsx! {
        div {
            class: format!("bg-white border-r border-gray-200 flex flex-col transition-all duration-300 {}",
                if collapsed { "w-12" } else { "w-80" }
            ),

            // Header with collapse toggle
            div {
                class: "p-4 border-b border-gray-200 flex items-center justify-between",
                if !collapsed {
                    h2 {
                        class: "text-lg font-semibold text-gray-900",
                        "📚 Databases"
                    }
                }
                button {
                    onclick: move |_| on_toggle_collapse.call(()),
                    class: "p-1 rounded hover:bg-gray-100 transition-colors",
                    svg {
                        class: "h-5 w-5 text-gray-500",
                        fill: "none",
                        stroke: "currentColor",
                        view_box: "0 0 24 24",
                        path {
                            stroke_linecap: "round",
                            stroke_linejoin: "round",
                            stroke_width: "2",
                            d: if collapsed { "M9 5l7 7-7 7" } else { "M15 19l-7-7 7-7" }
                        }
                    }
                }
            }

            if !collapsed {
                div {
                    class: "flex-1 overflow-y-auto p-2 space-y-1",
                    if databases_loading {
                        LoadingRow { label: "Loading databases..." }
                    } else if let Some(error) = databases_error {
                        div {
                            class: "px-2 py-1 text-xs text-red-600",
                            "Could not list databases: {error}"
                        }
                    } else if databases.is_empty() {
                        div {
                            class: "text-center py-8 text-gray-500",
                            div { "📚" }
                            div { class: "text-sm mt-2", "No databases found" }
                        }
                    } else {
                        for database in databases {
                            DatabaseNode {
                                key: "{database}",
                                browser,
                                expanded: database == selected_database,
                                database_name: database.clone(),
                                selected_table: selected_table.clone(),
                                tables: if database == selected_database { tables.clone() } else { Vec::new() },
                                loading: database == selected_database && tables_loading,
                                error: if database == selected_database { tables_error.clone().unwrap_or_default() } else { String::new() },
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn LoadingRow(label: String) -> Element {
    rsx! {
        div {
            class: "flex items-center px-2 py-1",
            div {
                class: "animate-spin rounded-full h-3 w-3 border border-gray-300 border-t-blue-600 mr-2"
            }
            span { class: "text-xs text-gray-500", "{label}" }
        }
    }
}

#[component]
fn DatabaseNode(
    browser: Signal<Browser>,
    database_name: String,
    expanded: bool,
    selected_table: String,
    tables: Vec<TableReference>,
    loading: bool,
    error: String,
) -> Element {
    let client = use_context::<Client>();

    rsx! {
        div {
            class: "select-none",

            div {
                class: format!("flex items-center rounded px-2 py-1 cursor-pointer {}",
                    if expanded { "bg-blue-50" } else { "hover:bg-gray-50" }
                ),
                onclick: {
                    let client = client.clone();
                    let name = database_name.clone();
                    move |_| {
                        let pending = browser.with_mut(|b| b.set_database(&name));
                        dispatch(browser, &client, pending);
                    }
                },

                div {
                    class: "w-4 h-4 mr-1 flex items-center justify-center",
                    svg {
                        class: format!("h-3 w-3 text-gray-500 transition-transform {}",
                            if expanded { "rotate-90" } else { "" }
                        ),
                        fill: "none",
                        stroke: "currentColor",
                        view_box: "0 0 24 24",
                        path {
                            stroke_linecap: "round",
                            stroke_linejoin: "round",
                            stroke_width: "2",
                            d: "M9 5l7 7-7 7"
                        }
                    }
                }
                span { class: "text-sm mr-2", "🗄️" }
                span { class: "text-sm font-medium text-gray-900 truncate", "{database_name}" }
            }

            if expanded {
                div {
                    class: "ml-4 mt-1 space-y-1",
                    if loading {
                        LoadingRow { label: "Loading tables..." }
                    } else if !error.is_empty() {
                        div {
                            class: "px-2 py-1 text-xs text-red-600",
                            "Could not list tables: {error}"
                        }
                    } else if tables.is_empty() {
                        div {
                            class: "px-2 py-1 text-xs text-gray-500 italic",
                            "No tables found"
                        }
                    } else {
                        for table in tables.iter() {
                            div {
                                key: "{table.name}",
                                class: format!("flex items-center px-2 py-1 rounded cursor-pointer transition-colors {}",
                                    if table.name == selected_table { "bg-blue-100" } else { "hover:bg-blue-50" }
                                ),
                                onclick: {
                                    let client = client.clone();
                                    let name = table.name.clone();
                                    move |_| {
                                        let pending = browser.with_mut(|b| b.set_table(&name));
                                        dispatch(browser, &client, pending);
                                    }
                                },
                                span { class: "text-sm mr-2", "📊" }
                                span { class: "text-xs text-gray-800 truncate", "{table.label()}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
