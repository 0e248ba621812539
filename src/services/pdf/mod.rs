//! Plan documents.
//!
//! A plan is first rendered to plain text through an askama template, then
//! laid out as Helvetica text lines in a PDF.

mod writer;

use askama::Template;

use crate::error::{AppError, AppResult};
use crate::models::VacationPlan;
use crate::utils::validate::DATE_FORMAT;

pub use writer::TextPdfWriter;

/// Turns a plan into a PDF byte stream.
pub trait PdfRenderer: Send + Sync {
    fn render(&self, plan: &VacationPlan) -> AppResult<Vec<u8>>;
}

#[derive(Template)]
#[template(path = "vacation_plan.txt")]
struct VacationPlanTemplate<'a> {
    id: i32,
    title: &'a str,
    description: &'a str,
    date: String,
    location: &'a str,
    participants: &'a [String],
}

impl<'a> From<&'a VacationPlan> for VacationPlanTemplate<'a> {
    fn from(plan: &'a VacationPlan) -> Self {
        Self {
            id: plan.id,
            title: &plan.title,
            description: &plan.description,
            date: plan.date.format(DATE_FORMAT).to_string(),
            location: &plan.location,
            participants: &plan.participants,
        }
    }
}

/// Renders `templates/vacation_plan.txt`; the first line becomes the heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplatePdfRenderer;

impl TemplatePdfRenderer {
    /// Renders the plan's text body without the PDF layout.
    pub fn render_text(&self, plan: &VacationPlan) -> AppResult<String> {
        VacationPlanTemplate::from(plan)
            .render()
            .map_err(|e| AppError::Internal {
                source: anyhow::anyhow!("Failed to render vacation plan template: {}", e),
            })
    }
}

impl PdfRenderer for TemplatePdfRenderer {
    fn render(&self, plan: &VacationPlan) -> AppResult<Vec<u8>> {
        let text = self.render_text(plan)?;
        let lines: Vec<&str> = text.lines().collect();
        Ok(TextPdfWriter::default().write(&lines))
    }
}
