use crate::browser::{Browser, PendingFetches};
use crate::catalog::{CatalogClient, Client, JsonFetcher};
use crate::pagination::{PAGE_SIZE_OPTIONS, SINGLE_ROW_JUMPS, WindowPolicy};
use dioxus::prelude::*;

/// Run every fetch in `pending` and feed the results back into `browser`.
///
/// Tasks are owned by the root scope so a fetch outlives the component that
/// triggered it, e.g. a table row in a collapsed nav pane.
pub fn dispatch<F>(
    mut browser: Signal<Browser>,
    client: &CatalogClient<F>,
    pending: PendingFetches,
) where
    F: JsonFetcher + Clone + 'static,
{
    let PendingFetches {
        databases,
        tables,
        payload,
    } = pending;

    if let Some(ticket) = databases {
        let client = client.clone();
        spawn_forever(async move {
            let result = client.list_databases(&ticket.key().endpoint).await;
            browser.with_mut(|b| b.resolve_databases(&ticket, result));
        });
    }

    if let Some(ticket) = tables {
        let client = client.clone();
        spawn_forever(async move {
            let key = ticket.key();
            let result = client.list_tables(&key.endpoint, &key.database).await;
            browser.with_mut(|b| b.resolve_tables(&ticket, result));
        });
    }

    if let Some(ticket) = payload {
        let client = client.clone();
        spawn_forever(async move {
            let key = ticket.key();
            let result = client
                .load_table(&key.endpoint, &key.database, &key.table, key.created.as_deref())
                .await;
            browser.with_mut(|b| b.resolve_payload(&ticket, result));
        });
    }
}

#[component]
pub fn ErrorBanner(title: String, message: String) -> Element {
    rsx! {
        div {
            class: "bg-red-50 border border-red-200 rounded-md p-4",
            div {
                class: "flex",
                div {
                    class: "flex-shrink-0",
                    svg {
                        class: "h-5 w-5 text-red-400",
                        fill: "currentColor",
                        view_box: "0 0 20 20",
                        path {
                            fill_rule: "evenodd",
                            d: "M10 18a8 8 0 100-16 8 8 0 000 16zM8.707 7.293a1 1 0 00-1.414 1.414L8.586 10l-1.293 1.293a1 1 0 101.414 1.414L10 11.414l1.293 1.293a1 1 0 001.414-1.414L11.414 10l1.293-1.293a1 1 0 00-1.414-1.414L10 8.586 8.707 7.293z",
                            clip_rule: "evenodd"
                        }
                    }
                }
                div {
                    class: "ml-3",
                    p { class: "text-sm font-medium text-red-800", "{title}" }
                    p { class: "text-sm text-red-700", "{message}" }
                }
            }
        }
    }
}

#[component]
pub fn Spinner(label: String) -> Element {
    rsx! {
        div {
            class: "flex items-center justify-center py-8",
            div {
                class: "animate-spin rounded-full h-8 w-8 border-b-2 border-blue-600 mr-3"
            }
            span { class: "text-sm text-gray-600", "{label}" }
        }
    }
}

#[component]
pub fn TableView(browser: Signal<Browser>) -> Element {
    let client = use_context::<Client>();
    let mut date_error = use_signal(|| Option::<String>::None);

    let state = browser.read();
    let selection = state.selection();
    let database = selection.database().to_string();
    let table = selection.table().to_string();
    let date_value = selection.date_filter_iso().unwrap_or_default();

    if table.is_empty() {
        return rsx! {
            div {
                class: "text-center py-12",
                h2 {
                    class: "text-2xl font-semibold text-gray-900 mb-4",
                    "Pick a table"
                }
                p {
                    class: "text-gray-600",
                    if database.is_empty() {
                        "Choose a database in the left pane, then one of its tables."
                    } else {
                        "Choose one of the tables in {database}."
                    }
                }
            }
        };
    }

    let window = state.window();
    let payload_error = state.payload_error().map(|e| e.to_string());
    let columns = state
        .payload()
        .map(|payload| payload.columns.clone())
        .unwrap_or_default();
    let rendered_rows: Vec<(usize, Vec<String>)> = match state.payload() {
        Some(payload) => window
            .rows
            .iter()
            .enumerate()
            .map(|(offset, row)| {
                let cells = (0..columns.len())
                    .map(|column| payload.cell(row, column).to_string())
                    .collect();
                (window.first_row_number.saturating_add(offset), cells)
            })
            .collect(),
        None => Vec::new(),
    };
    let loading = window.table_data_loading;
    let total_rows = window.total_rows;
    let past_end = window.is_past_end();

    rsx! {
        div {
            class: "space-y-4",

            // Title and date filter
            div {
                class: "flex items-end justify-between",
                div {
                    h2 { class: "text-2xl font-semibold text-gray-900", "{table}" }
                    p { class: "text-sm text-gray-500", "{database}" }
                }
                div {
                    label {
                        class: "block text-sm font-medium text-gray-700 mb-1",
                        "Created on"
                    }
                    div {
                        class: "flex items-center space-x-2",
                        input {
                            r#type: "date",
                            value: "{date_value}",
                            onchange: {
                                let client = client.clone();
                                move |evt: Event<FormData>| {
                                    match browser.with_mut(|b| b.set_date_filter(&evt.value())) {
                                        Ok(pending) => {
                                            date_error.set(None);
                                            dispatch(browser, &client, pending);
                                        }
                                        Err(e) => date_error.set(Some(format!("Invalid date: {}", e))),
                                    }
                                }
                            },
                            class: "px-3 py-2 border border-gray-300 rounded-md text-sm"
                        }
                        if !date_value.is_empty() {
                            button {
                                onclick: {
                                    let client = client.clone();
                                    move |_| {
                                        if let Ok(pending) = browser.with_mut(|b| b.set_date_filter("")) {
                                            date_error.set(None);
                                            dispatch(browser, &client, pending);
                                        }
                                    }
                                },
                                class: "text-sm text-gray-500 hover:text-gray-700",
                                "Clear"
                            }
                        }
                    }
                    if let Some(error) = date_error() {
                        p { class: "text-xs text-red-600 mt-1", "{error}" }
                    }
                }
            }

            PaginationControls { browser }

            if loading {
                Spinner { label: "Loading rows..." }
            } else if let Some(error) = payload_error {
                ErrorBanner { title: "Could not load table", message: error }
            } else if total_rows == 0 {
                p { class: "text-sm text-gray-500 italic", "This table has no rows" }
            } else if rendered_rows.is_empty() {
                p {
                    class: "text-sm text-gray-500 italic",
                    if past_end { "Past the last page" } else { "No rows on this page" }
                }
            } else {
                div {
                    class: "overflow-x-auto bg-white shadow rounded-lg",
                    table {
                        class: "min-w-full divide-y divide-gray-200",
                        thead {
                            class: "bg-gray-50",
                            tr {
                                th { class: "px-3 py-2 text-left text-xs font-medium text-gray-500", "#" }
                                for column in columns.iter() {
                                    th {
                                        class: "px-3 py-2 text-left text-xs font-medium text-gray-500 uppercase tracking-wider",
                                        "{column}"
                                    }
                                }
                            }
                        }
                        tbody {
                            class: "bg-white divide-y divide-gray-200",
                            for (number, cells) in rendered_rows.into_iter() {
                                tr {
                                    key: "{number}",
                                    class: "hover:bg-gray-50",
                                    td { class: "px-3 py-2 text-xs text-gray-400", "{number}" }
                                    for cell in cells {
                                        td { class: "px-3 py-2 text-sm text-gray-900 whitespace-nowrap", "{cell}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn PaginationControls(browser: Signal<Browser>) -> Element {
    let state = browser.read();
    let window = state.window();
    let pager = *state.pager();
    let page = window.page;
    let last_page = window.last_page;
    let total_rows = window.total_rows;
    let shown = window.rows.len();
    let first = window.first_row_number;
    let last_shown = first.saturating_add(shown).saturating_sub(1);

    let nav_button = "px-3 py-1 text-sm border border-gray-300 rounded-md hover:bg-gray-50";

    rsx! {
        div {
            class: "flex flex-wrap items-center gap-3 bg-white shadow rounded-lg px-4 py-3",

            select {
                class: "px-2 py-1 border border-gray-300 rounded-md text-sm",
                onchange: move |evt: Event<FormData>| {
                    let policy = if evt.value() == "single_row" {
                        WindowPolicy::SingleRow
                    } else {
                        WindowPolicy::Paged
                    };
                    browser.with_mut(|b| b.set_window_policy(policy));
                },
                option { value: "paged", selected: pager.policy == WindowPolicy::Paged, "Pages" }
                option { value: "single_row", selected: pager.policy == WindowPolicy::SingleRow, "Single row" }
            }

            match pager.policy {
                WindowPolicy::Paged => rsx! {
                    select {
                        class: "px-2 py-1 border border-gray-300 rounded-md text-sm",
                        onchange: move |evt: Event<FormData>| {
                            if let Ok(size) = evt.value().parse::<usize>() {
                                browser.with_mut(|b| b.set_page_size(size));
                            }
                        },
                        for size in PAGE_SIZE_OPTIONS {
                            option {
                                value: "{size}",
                                selected: pager.page_size() == size,
                                "{size} per page"
                            }
                        }
                    }
                    button { class: nav_button, onclick: move |_| browser.with_mut(|b| b.first_page()), "First" }
                    button { class: nav_button, onclick: move |_| browser.with_mut(|b| b.previous_page()), "Previous" }
                    button { class: nav_button, onclick: move |_| browser.with_mut(|b| b.next_page()), "Next" }
                    button { class: nav_button, onclick: move |_| browser.with_mut(|b| b.last_page()), "Last" }
                },
                WindowPolicy::SingleRow => rsx! {
                    for target in SINGLE_ROW_JUMPS {
                        button {
                            class: nav_button,
                            onclick: move |_| browser.with_mut(|b| b.go_to_page(target as f64)),
                            "Row {target}"
                        }
                    }
                    button { class: nav_button, onclick: move |_| browser.with_mut(|b| b.previous_page()), "Previous" }
                    button { class: nav_button, onclick: move |_| browser.with_mut(|b| b.next_page()), "Next" }
                },
            }

            input {
                r#type: "number",
                min: "1",
                value: "{page}",
                onchange: move |evt: Event<FormData>| {
                    browser.with_mut(|b| b.set_page_input(&evt.value()));
                },
                class: "w-20 px-2 py-1 border border-gray-300 rounded-md text-sm"
            }

            span {
                class: "ml-auto text-sm text-gray-600",
                if shown > 0 {
                    "Rows {first}–{last_shown} of {total_rows} · page {page} of {last_page}"
                } else {
                    "{total_rows} rows · page {page} of {last_page}"
                }
            }
        }
    }
}
