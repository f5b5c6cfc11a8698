use std::fmt::Write;

use crate::ranking::{summarize, ModelSummary};
use crate::state::{Phase, ViewState};

const STYLE: &str = "body{font-family:sans-serif;background:#1f2937;color:#f9fafb;margin:0}\
main{max-width:40rem;margin:2rem auto;padding:2rem;background:#111827;border-radius:1.5rem}\
h1{text-align:center}.card{background:#374151;border-radius:1rem;padding:1rem;margin:1rem 0}\
.row{display:flex;justify-content:space-between;font-size:.9rem;color:#d1d5db}\
.top{color:#4ade80;font-weight:bold}.unavailable{color:#f87171}\
img{display:block;max-width:24rem;margin:1rem auto;border-radius:1rem}";

/// Renders the whole comparison page for one snapshot.
pub fn render_page(state: &ViewState) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str("<title>Brain Tumor Detector</title><style>");
    html.push_str(STYLE);
    html.push_str("</style></head><body><main><h1>Brain Tumor Detector</h1>");

    html.push_str(
        "<form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\
         <label>Upload Image <input type=\"file\" name=\"file\" accept=\"image/*\"></label> \
         <button type=\"submit\">Predict</button></form>",
    );

    match &state.image {
        Some(image) => {
            let name = image.file_name.as_deref().unwrap_or("File selected");
            let _ = write!(
                html,
                "<p>{}</p><img src=\"{}\" alt=\"Uploaded\">",
                escape(name),
                image.preview
            );
        }
        None => html.push_str("<p>No file selected</p>"),
    }

    if state.phase == Phase::Aggregating {
        html.push_str("<p class=\"busy\">Running predictions&hellip;</p>");
    }

    for summary in summarize(&state.predictions) {
        render_card(&mut html, &summary);
    }

    html.push_str("</main></body></html>");
    html
}

fn render_card(html: &mut String, summary: &ModelSummary) {
    let _ = write!(html, "<div class=\"card\"><div><strong>{}:</strong> ", summary.model);
    match &summary.reported {
        Some(reported) => {
            let _ = write!(html, "{} (Index: {})", reported.label, reported.index);
        }
        None => html.push_str("<span class=\"unavailable\">Prediction unavailable</span>"),
    }
    html.push_str("</div>");

    for row in &summary.rows {
        let _ = write!(
            html,
            "<div class=\"row{}\"><span>{}:</span><span>{:.2}%{}</span></div>",
            if row.is_top { " top" } else { "" },
            row.label,
            row.percentage,
            if row.is_top { " &#10004;" } else { "" }
        );
    }
    html.push_str("</div>");
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::from_bytes;
    use crate::models::{ModelPrediction, PredictionOutcome, PredictionSet};
    use crate::registry::MODELS;
    use std::sync::Arc;

    fn complete_state(outcomes: Vec<PredictionOutcome>) -> ViewState {
        let entries = MODELS
            .iter()
            .zip(outcomes)
            .map(|(&model, outcome)| ModelPrediction { model, outcome })
            .collect();
        ViewState {
            phase: Phase::Complete,
            cycle: 1,
            image: Some(Arc::new(from_bytes(vec![1, 2], Some("<scan>.png".into())))),
            predictions: Arc::new(PredictionSet::from_entries(entries)),
        }
    }

    #[test]
    fn idle_page_has_form_and_no_cards() {
        let html = render_page(&ViewState::default());
        assert!(html.contains("name=\"file\""));
        assert!(html.contains("No file selected"));
        assert!(!html.contains("class=\"card\""));
    }

    #[test]
    fn success_and_failure_cards_render_in_order() {
        let ok = PredictionOutcome::Success {
            class_index: 2,
            percentages: vec![1.0, 2.0, 90.0, 7.0],
        };
        let state = complete_state(vec![
            PredictionOutcome::Failure,
            ok.clone(),
            ok.clone(),
            ok.clone(),
            ok,
        ]);
        let html = render_page(&state);

        assert_eq!(html.matches("class=\"card\"").count(), MODELS.len());
        assert_eq!(html.matches("Prediction unavailable").count(), 1);
        assert_eq!(html.matches("no_tumor (Index: 2)").count(), 4);
        assert!(html.contains("90.00% &#10004;"));

        let positions: Vec<usize> = MODELS
            .iter()
            .map(|m| html.find(&format!("<strong>{m}:</strong>")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn file_name_is_escaped() {
        let html = render_page(&complete_state(vec![PredictionOutcome::Failure; 5]));
        assert!(html.contains("&lt;scan&gt;.png"));
        assert!(!html.contains("<scan>"));
    }

    #[test]
    fn aggregating_shows_busy_notice() {
        let mut state = complete_state(vec![]);
        state.phase = Phase::Aggregating;
        state.predictions = Arc::new(PredictionSet::default());
        assert!(render_page(&state).contains("Running predictions"));
    }
}
