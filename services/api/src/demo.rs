use crate::infra::{demo_composition, DemoCatalogStore, DEMO_LANGUAGE, DEMO_TEST_TYPE};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use survey_engine::composition::DeliveryRules;
use survey_engine::config::AppConfig;
use survey_engine::error::AppError;
use survey_engine::scoring::{
    AnswerSet, AnswerValue, CsvCatalogStore, ScoringRequest, SurveyScoringService,
};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Test type of the catalog partition (e.g. DISC, MBTI)
    #[arg(long)]
    pub(crate) test_type: String,
    /// Result language (free-form names like "Français" are accepted)
    #[arg(long)]
    pub(crate) language: String,
    /// Language the respondent answered in, when different from --language
    #[arg(long)]
    pub(crate) origin_language: Option<String>,
    /// JSON file mapping answer headers to values
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Override the configured catalog directory
    #[arg(long)]
    pub(crate) catalog_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the composed email for every planned recipient
    #[arg(long)]
    pub(crate) all_recipients: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        test_type,
        language,
        origin_language,
        answers,
        catalog_dir,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(catalog_dir) = catalog_dir {
        config.catalogs.directory = catalog_dir;
    }

    let raw = std::fs::read_to_string(&answers)?;
    let answers: AnswerSet = serde_json::from_str(&raw).map_err(|err| {
        AppError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("answers file is not a JSON object of answers: {err}"),
        ))
    })?;

    let store = Arc::new(CsvCatalogStore::new(config.catalogs.directory));
    let service = SurveyScoringService::new(store);

    let result = service.run(&ScoringRequest {
        test_type,
        language,
        origin_language,
        answers,
    })?;

    println!(
        "{}",
        serde_json::to_string_pretty(&result)
            .unwrap_or_else(|_| "<unserializable result>".to_string())
    );
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = SurveyScoringService::new(Arc::new(DemoCatalogStore::default()));

    let answers: AnswerSet = [
        ("Your name", "Ada Lovelace"),
        ("Your e-mail address", "ada@example.com"),
        ("Q1: In a team you usually...", "Lead the group"),
        ("Q2: What keeps you motivated?", "Deadlines,Checklists"),
        ("Q3: How decisive are you day to day?", "4"),
    ]
    .into_iter()
    .map(|(header, value)| (header.to_string(), AnswerValue::Text(value.to_string())))
    .collect();

    let request = ScoringRequest {
        test_type: DEMO_TEST_TYPE.to_string(),
        language: DEMO_LANGUAGE.to_string(),
        origin_language: None,
        answers,
    };

    let result = service.run(&request)?;

    println!("Survey scoring demo");
    println!("  test type: {}", result.test_type);
    println!(
        "  language: {}",
        survey_engine::scoring::normalize::language_display_name(&result.language)
    );
    println!("  final profile: {} ({})", result.outcome.code(), result.profile_title);
    for (code, score) in result.sorted_scores() {
        println!("  {}: {} points", result.display_name(code), score);
    }

    let email = demo_composition().compose(&result, &request.answers, "N1", DEMO_LANGUAGE);
    let rules = DeliveryRules {
        respondent_enabled: true,
        trainer_email: Some("trainer@example.com".to_string()),
        sponsor_email: None,
        developer_email: None,
    };
    let recipients = rules.recipients(Some("ada@example.com"));

    println!("\nComposed email");
    println!("  subject: {}", email.subject);
    println!("  body: {}", email.html_body);

    if args.all_recipients {
        for recipient in &recipients {
            println!("\nDelivery to {}", recipient.address);
            println!("  subject: {}", email.subject_for(recipient, "Copy: "));
            println!("  body: {}", email.body_for(recipient));
        }
    } else {
        println!(
            "  recipients: {}",
            recipients
                .iter()
                .map(|recipient| recipient.address.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(())
}
