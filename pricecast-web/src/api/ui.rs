//! HTML product form
//!
//! `GET /` renders the empty form. `POST /` runs the pipeline for the
//! submitted `product_name` and renders either the matched product with its
//! three estimates or a not-found notice.

use axum::{
    extract::{Form, State},
    response::Html,
};
use pricecast_common::{PredictError, PredictionOutcome};
use serde::Deserialize;
use tracing::debug;

use super::BuildInfo;
use crate::AppState;

/// Submitted form fields
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub product_name: String,
}

/// What the page shows below the form
enum View<'a> {
    Empty,
    Result(&'a PredictionOutcome),
    NotFound(&'a str),
}

/// GET /
pub async fn serve_index() -> Html<String> {
    Html(render_page("", View::Empty))
}

/// POST /
///
/// A query with no match is an ordinary outcome: the page renders with a
/// notice and status 200.
pub async fn submit_form(State(state): State<AppState>, Form(form): Form<ProductForm>) -> Html<String> {
    let page = match state.pipeline.predict_for(&form.product_name) {
        Ok(outcome) => render_page(&form.product_name, View::Result(&outcome)),
        Err(PredictError::ProductNotFound { query }) => {
            debug!(query = %query, "Form query matched no product");
            render_page(&form.product_name, View::NotFound(&query))
        }
    };
    Html(page)
}

/// Escape text for HTML body and attribute positions
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn render_result(outcome: &PredictionOutcome) -> String {
    let product = &outcome.product;
    let estimates: String = outcome
        .estimates()
        .iter()
        .map(|(role, value)| {
            format!(
                "            <tr><th>{}</th><td>{:.2}</td></tr>\n",
                escape_html(role.label()),
                value
            )
        })
        .collect();

    format!(
        r#"
    <section class="result">
        <h2>{name}</h2>
        <img src="{image}" alt="{name}" class="product-image">
        <table class="details">
            <tr><th>Ratings</th><td>{ratings}</td></tr>
            <tr><th>Number of ratings</th><td>{count}</td></tr>
            <tr><th>Actual price</th><td>₹{price:.2}</td></tr>
        </table>
        <h3>Predicted price</h3>
        <table class="estimates">
{estimates}        </table>
    </section>"#,
        name = escape_html(&product.name),
        image = escape_html(&product.image),
        ratings = product.ratings,
        count = product.no_of_ratings,
        price = product.actual_price,
        estimates = estimates,
    )
}

fn render_not_found(query: &str) -> String {
    format!(
        r#"
    <section class="not-found">
        <p>No product matches "{}". Try a shorter or different name.</p>
    </section>"#,
        escape_html(query)
    )
}

fn render_page(query: &str, view: View<'_>) -> String {
    let body = match view {
        View::Empty => String::new(),
        View::Result(outcome) => render_result(outcome),
        View::NotFound(q) => render_not_found(q),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>pricecast</title>
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
            padding: 20px;
        }}
        h1 {{
            color: #4a9eff;
        }}
        input[type=text] {{
            padding: 6px;
            width: 320px;
        }}
        th {{
            text-align: left;
            padding-right: 20px;
            color: #888;
        }}
        .product-image {{
            max-width: 240px;
            margin: 10px 0;
        }}
        .not-found {{
            color: #ff8a4a;
        }}
        footer {{
            margin-top: 30px;
            font-size: 12px;
            color: #666;
            font-family: 'Courier New', monospace;
        }}
    </style>
</head>
<body>
    <h1>pricecast</h1>
    <form method="post" action="/">
        <label for="product_name">Product name</label>
        <input type="text" id="product_name" name="product_name" value="{query}" required>
        <button type="submit">Predict</button>
    </form>
{body}
    <footer>{build}</footer>
</body>
</html>
"#,
        query = escape_html(query),
        body = body,
        build = escape_html(&BuildInfo::current().to_string()),
    )
}
