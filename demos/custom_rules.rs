//! Example: Extending the built-in publisher rules.
//!
//! This example demonstrates how to:
//! - add a substring rule with the lowest priority
//! - add a regex rule with the highest priority
//! - inspect the resulting rule table
//!
//! # Usage
//!
//! ```bash
//! cargo run --example custom_rules
//! ```

use omnivore_inbound::rules::{Predicate, Rule, RuleTable};
use omnivore_inbound::{Classifier, ClassifierConfig, NewsletterHandler, RawEmail};

fn main() -> omnivore_inbound::Result<()> {
    let mut rules = RuleTable::with_defaults();

    // Bloomberg moved some newsletters to a new sending domain
    rules.push(Rule::new(
        Predicate::from_contains("news.bloomberg.com"),
        NewsletterHandler::Bloomberg,
    ));

    // Axios Pro issues carry no browser link; treat them as generic newsletters
    rules.prepend(Rule::new(
        Predicate::from_pattern(r"@pro\.axios\.com>$")?,
        NewsletterHandler::Default,
    ));

    println!("Rule table:");
    for (position, rule) in rules.rules().iter().enumerate() {
        println!("  {position}: {:?} -> {}", rule.predicate, rule.handler);
    }

    let classifier = Classifier::new(ClassifierConfig::builder().rules(rules).build()?);

    let emails = [
        RawEmail::new("Bloomberg <noreply@news.bloomberg.com>", "Evening Briefing").with_html(
            r#"<a class="view-in-browser__url" href="https://www.bloomberg.com/news/x">View</a>"#,
        ),
        RawEmail::new("Axios Pro <pro@pro.axios.com>", "Tech Deals")
            .with_unsubscribe("<https://pro.axios.com/unsubscribe>"),
        RawEmail::new("Mike Allen <mike@axios.com>", "Axios AM")
            .with_html("View in browser at <a>https://axios.com/newsletters/axios-am</a>"),
    ];

    for email in &emails {
        let classification = classifier.classify(email);
        println!("\n{} -> {}", email.from(), classification.kind());
        if let Some(newsletter) = classification.as_newsletter() {
            println!("  handler: {}", newsletter.handler);
            println!(
                "  url:     {}",
                newsletter.result.canonical_url.as_deref().unwrap_or("<none>")
            );
        }
    }

    Ok(())
}
