//! Result email composition.
//!
//! The outgoing result email is assembled from an ordered table of content
//! blocks filtered by test type, language, email level, and resolved profile.
//! Everything here is pure data transformation: the composer produces the
//! subject, the HTML body, attachment ids, and the recipient plan. Actual
//! delivery (SMTP, attachment fetching) stays with the host.

mod template;

pub use template::render_placeholders;

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::scoring::domain::AnswerSet;
use crate::scoring::normalize::normalize_text;
use crate::scoring::SurveyResult;

/// Kind of content a composition block contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockElement {
    /// Replaces the default subject line.
    Subject,
    /// Opening paragraph(s).
    Introduction,
    /// Main body paragraph(s).
    BodyText,
    /// Attachment id to include with the email.
    Document,
    /// Template expanded once per score map entry, highest score first.
    ScoreLine,
    /// Paragraph prepended only to copies sent to non-respondents.
    CopyNotice,
}

impl BlockElement {
    fn parse(value: &str) -> Option<Self> {
        match normalize_text(value).as_str() {
            "subject" => Some(BlockElement::Subject),
            "introduction" => Some(BlockElement::Introduction),
            "body" | "body text" => Some(BlockElement::BodyText),
            "document" => Some(BlockElement::Document),
            "score line" => Some(BlockElement::ScoreLine),
            "copy notice" => Some(BlockElement::CopyNotice),
            _ => None,
        }
    }
}

/// One row of the composition table. Empty test-type and profile tags are
/// wildcards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionBlock {
    pub test_type: String,
    pub language: String,
    pub levels: Vec<String>,
    pub profile: String,
    pub element: BlockElement,
    pub order: i64,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct BlockRow {
    #[serde(default)]
    test_type: String,
    language: String,
    #[serde(default)]
    levels: String,
    #[serde(default)]
    profile: String,
    element: String,
    #[serde(default)]
    order: i64,
    #[serde(default)]
    content: String,
}

/// The loaded composition table.
#[derive(Debug, Clone, Default)]
pub struct CompositionCatalog {
    blocks: Vec<CompositionBlock>,
}

impl CompositionCatalog {
    pub fn new(blocks: Vec<CompositionBlock>) -> Self {
        Self { blocks }
    }

    /// Loads composition blocks from a CSV export. Rows with an unknown
    /// element kind are skipped with a warning.
    pub fn from_reader<R: Read>(reader: R) -> Self {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut blocks = Vec::new();

        for row in csv_reader.deserialize::<BlockRow>() {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    warn!(%err, "skipping malformed composition row");
                    continue;
                }
            };

            let Some(element) = BlockElement::parse(&row.element) else {
                warn!(element = %row.element, "skipping composition row with unknown element");
                continue;
            };

            blocks.push(CompositionBlock {
                test_type: row.test_type,
                language: row.language,
                levels: row
                    .levels
                    .split(',')
                    .map(str::trim)
                    .filter(|level| !level.is_empty())
                    .map(str::to_string)
                    .collect(),
                profile: row.profile,
                element,
                order: row.order,
                content: row.content,
            });
        }

        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Composes the result email for one scoring run.
    pub fn compose(
        &self,
        result: &SurveyResult,
        answers: &AnswerSet,
        level: &str,
        language: &str,
    ) -> ComposedEmail {
        let mut selected: Vec<&CompositionBlock> = self
            .blocks
            .iter()
            .filter(|block| block_applies(block, result, level, language))
            .collect();
        selected.sort_by_key(|block| block.order);

        let mut subject = format!("Your {} test results", result.test_type);
        let mut body = String::new();
        let mut attachment_ids: Vec<String> = Vec::new();
        let mut copy_notice = None;

        for block in selected {
            match block.element {
                BlockElement::Subject => subject = block.content.clone(),
                BlockElement::Introduction | BlockElement::BodyText => {
                    body.push_str(&block.content);
                    body.push_str("<br>");
                }
                BlockElement::Document => {
                    let id = block.content.trim();
                    if !id.is_empty() && !attachment_ids.iter().any(|known| known == id) {
                        attachment_ids.push(id.to_string());
                    }
                }
                BlockElement::ScoreLine => {
                    for (code, score) in result.sorted_scores() {
                        let line = block
                            .content
                            .replace("{{profile_name}}", result.display_name(code))
                            .replace("{{score}}", &crate::scoring::domain::format_score(score));
                        body.push_str(&line);
                        body.push_str("<br>");
                    }
                }
                BlockElement::CopyNotice => copy_notice = Some(block.content.clone()),
            }
        }

        let values = placeholder_values(result, answers);
        ComposedEmail {
            subject: render_placeholders(&subject, &values),
            html_body: render_placeholders(&body, &values),
            attachment_ids,
            copy_notice: copy_notice.map(|notice| render_placeholders(&notice, &values)),
        }
    }
}

fn block_applies(
    block: &CompositionBlock,
    result: &SurveyResult,
    level: &str,
    language: &str,
) -> bool {
    let test_type_matches = block.test_type.trim().is_empty()
        || normalize_text(&block.test_type) == normalize_text(&result.test_type);
    let language_matches = block.language.eq_ignore_ascii_case(language);
    let level_matches = block.levels.is_empty()
        || block
            .levels
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(level));
    let profile_matches =
        block.profile.trim().is_empty() || block.profile.trim() == result.outcome.code();

    test_type_matches && language_matches && level_matches && profile_matches
}

/// Substitution values: every answer cell plus the assembled result fields;
/// the result wins when both carry the same key.
fn placeholder_values(result: &SurveyResult, answers: &AnswerSet) -> BTreeMap<String, String> {
    let mut values: BTreeMap<String, String> = answers
        .iter()
        .map(|(header, value)| (header.clone(), value.as_text()))
        .collect();
    for (key, value) in &result.fields {
        values.insert(key.clone(), value.clone());
    }
    values
}

/// A fully rendered result email, ready for an external transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedEmail {
    pub subject: String,
    pub html_body: String,
    pub attachment_ids: Vec<String>,
    pub copy_notice: Option<String>,
}

impl ComposedEmail {
    /// Subject line for one recipient; copies get the localized prefix.
    pub fn subject_for(&self, recipient: &Recipient, copy_prefix: &str) -> String {
        if recipient.is_copy {
            format!("{copy_prefix}{}", self.subject)
        } else {
            self.subject.clone()
        }
    }

    /// Body for one recipient; copies get the copy notice prepended.
    pub fn body_for(&self, recipient: &Recipient) -> String {
        match (&self.copy_notice, recipient.is_copy) {
            (Some(notice), true) => format!("{notice}{}", self.html_body),
            _ => self.html_body.clone(),
        }
    }
}

/// Per-campaign delivery switches, mirroring the campaign configuration row.
#[derive(Debug, Clone, Default)]
pub struct DeliveryRules {
    pub respondent_enabled: bool,
    pub trainer_email: Option<String>,
    pub sponsor_email: Option<String>,
    pub developer_email: Option<String>,
}

/// One planned delivery target. `is_copy` drives the subject prefix and the
/// copy notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub address: String,
    pub is_copy: bool,
}

impl DeliveryRules {
    /// Expands the switches into a deduplicated recipient list. Everyone but
    /// the respondent receives a copy.
    pub fn recipients(&self, respondent_email: Option<&str>) -> Vec<Recipient> {
        let mut recipients: Vec<Recipient> = Vec::new();
        let mut push = |address: Option<&str>, is_copy: bool| {
            let Some(address) = address else {
                return;
            };
            let address = address.trim();
            if address.is_empty() {
                return;
            }
            if recipients
                .iter()
                .any(|known| known.address.eq_ignore_ascii_case(address))
            {
                return;
            }
            recipients.push(Recipient {
                address: address.to_string(),
                is_copy,
            });
        };

        if self.respondent_enabled {
            push(respondent_email, false);
        }
        push(self.trainer_email.as_deref(), true);
        push(self.sponsor_email.as_deref(), true);
        push(self.developer_email.as_deref(), true);

        recipients
    }
}
