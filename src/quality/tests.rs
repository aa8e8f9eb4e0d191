//! Tests for quality scoring.

use super::*;
use crate::analyze::TokenCounter;
use crate::config::{Bindings, TemplateConfig, VariableDeclaration};
use serde_json::json;

fn scorer() -> QualityScorer {
    QualityScorer::new(TokenCounter::heuristic())
}

fn dimension(report: &QualityReport, dimension: QualityDimension) -> &DimensionScore {
    report.dimension(dimension).unwrap()
}

fn bare_template() -> TemplateConfig {
    TemplateConfig::builder("bare")
        .variable(VariableDeclaration::new("text"))
        .template("Summarize {{ text }}")
        .build()
        .unwrap()
}

#[test]
fn test_weights_sum_to_one_hundred() {
    let total: u32 = QualityDimension::ALL.iter().map(|d| d.weight_percent()).sum();
    assert_eq!(total, 100);
    assert_eq!(QualityDimension::Clarity.weight(), 0.25);
}

#[test]
fn test_grade_thresholds() {
    assert_eq!(Grade::from_score(100), Grade::A);
    assert_eq!(Grade::from_score(90), Grade::A);
    assert_eq!(Grade::from_score(89), Grade::B);
    assert_eq!(Grade::from_score(80), Grade::B);
    assert_eq!(Grade::from_score(70), Grade::C);
    assert_eq!(Grade::from_score(69), Grade::D);
    assert_eq!(Grade::from_score(60), Grade::D);
    assert_eq!(Grade::from_score(59), Grade::F);
    assert_eq!(Grade::from_score(0), Grade::F);
}

#[test]
fn test_well_formed_template_scores_full_marks() {
    let config = TemplateConfig::builder("code-review")
        .description("Review code changes for bugs and style issues")
        .tag("code")
        .tag("review")
        .variable(VariableDeclaration::new("code").with_description("The code to review"))
        .variable(
            VariableDeclaration::new("language")
                .optional()
                .with_default("python")
                .with_description("Programming language"),
        )
        .system_prompt(
            "You are an expert code reviewer.\n<instructions>\nPlease review the code carefully.\n\
             </instructions>\n<output_format>\nRespond in markdown.\n</output_format>",
        )
        .user_prompt("<code language=\"{{ language }}\">\n{{ code }}\n</code>")
        .build()
        .unwrap();

    let report = scorer().score(&config, &Bindings::new());

    for score in &report.dimensions {
        assert_eq!(score.score, 100, "{} scored {:?}", score.dimension, score.details);
    }
    assert_eq!(report.overall_score, 100);
    assert_eq!(report.grade, Grade::A);
    assert!(report.is_production_ready());
    assert!(report.top_suggestions.is_empty());
    assert_eq!(
        report.summary,
        "Excellent quality template, ready for production use."
    );

    let structure = dimension(&report, QualityDimension::Structure);
    assert_eq!(structure.details[0], "Uses system_prompt/user_prompt split");
}

#[test]
fn test_bare_template_scores() {
    let report = scorer().score(&bare_template(), &Bindings::new());

    let clarity = dimension(&report, QualityDimension::Clarity);
    assert_eq!(clarity.score, 50);
    assert_eq!(
        clarity.details,
        vec![
            "No clear role definition",
            "Task instructions could be clearer",
            "No output format specification",
            "Only 0/1 variables have descriptions",
        ]
    );

    assert_eq!(dimension(&report, QualityDimension::Consistency).score, 100);
    assert_eq!(dimension(&report, QualityDimension::Completeness).score, 82);
    assert_eq!(dimension(&report, QualityDimension::Efficiency).score, 100);

    let structure = dimension(&report, QualityDimension::Structure);
    assert_eq!(structure.score, 100);
    assert_eq!(structure.details, vec!["Uses single template format"]);

    assert_eq!(report.overall_score, 83);
    assert_eq!(report.grade, Grade::B);
    assert!(report.is_production_ready());
}

#[test]
fn test_top_suggestions_are_deduplicated_and_capped() {
    let report = scorer().score(&bare_template(), &Bindings::new());
    assert_eq!(
        report.top_suggestions,
        vec![
            "Add a clear role definition (e.g., 'You are a...')",
            "Add explicit task instructions",
            "Specify expected output format",
            "Add descriptions to all variables",
            "Add a template description",
        ]
    );
}

#[test]
fn test_ambiguous_phrases_are_penalized() {
    let config = TemplateConfig::builder("vague")
        .template(
            "You are a helper. Please answer. Respond in prose. Maybe do this. \
             Perhaps that. You might want to check. Maybe again.",
        )
        .build()
        .unwrap();

    let clarity = scorer().score(&config, &Bindings::new());
    let clarity = dimension(&clarity, QualityDimension::Clarity);
    assert_eq!(clarity.score, 90);
    assert!(clarity.details.contains(&"Found 4 ambiguous phrases".to_string()));
}

#[test]
fn test_mixed_naming_and_enum_types() {
    let config = TemplateConfig::builder("mixed")
        .variable(VariableDeclaration::new("user_name").with_description("Name of the user"))
        .variable(VariableDeclaration::new("userAge").with_description("Age of the user"))
        .variable(
            VariableDeclaration::new("style")
                .with_description("Writing style")
                .with_enum([serde_json::json!(1), serde_json::json!("formal")]),
        )
        .template("{{ user_name }} {{ userAge }} {{ style }}")
        .build()
        .unwrap();

    let report = scorer().score(&config, &Bindings::new());
    let consistency = dimension(&report, QualityDimension::Consistency);
    assert_eq!(consistency.score, 75);
    assert_eq!(
        consistency.details,
        vec![
            "Mixed naming conventions (snake_case and camelCase)",
            "Variable 'style' has inconsistent enum types",
        ]
    );
    assert_eq!(
        consistency.suggestions,
        vec!["Use consistent naming convention for variables"]
    );

    // An enum is present, so no completeness penalty for the constrained name.
    let completeness = dimension(&report, QualityDimension::Completeness);
    assert!(
        !completeness
            .suggestions
            .iter()
            .any(|s| s.contains("enum values"))
    );
}

#[test]
fn test_prompt_formatting_mismatch_and_duplicates() {
    let mismatch = TemplateConfig::builder("mismatch")
        .system_prompt("<role>You are a reviewer</role>")
        .user_prompt("Review {{ code }}")
        .build()
        .unwrap();
    let consistency = scorer().score(&mismatch, &Bindings::new());
    let consistency = dimension(&consistency, QualityDimension::Consistency);
    assert_eq!(consistency.score, 90);
    assert_eq!(
        consistency.details,
        vec!["Inconsistent formatting between system_prompt and user_prompt"]
    );

    let duplicated = TemplateConfig::builder("dup")
        .system_prompt("You are a reviewer. Always check the code for security issues carefully.")
        .user_prompt("Here is code: {{ code }}. Always check the code for security issues carefully.")
        .build()
        .unwrap();
    let consistency = scorer().score(&duplicated, &Bindings::new());
    let consistency = dimension(&consistency, QualityDimension::Consistency);
    assert_eq!(consistency.score, 90);
    assert_eq!(
        consistency.details,
        vec![
            "Consistent formatting across prompts",
            "Duplicate content found between prompts",
        ]
    );
}

#[test]
fn test_completeness_checks() {
    let config = TemplateConfig::builder("incomplete")
        .description("Too short")
        .variable(VariableDeclaration::new("a"))
        .variable(VariableDeclaration::new("b"))
        .variable(VariableDeclaration::new("c"))
        .variable(VariableDeclaration::new("format").optional())
        .template("{{ a }}{{ b }}{{ c }}{% if format %}{{ format }}{% endif %}")
        .build()
        .unwrap();

    let report = scorer().score(&config, &Bindings::new());
    let completeness = dimension(&report, QualityDimension::Completeness);

    // brief -5, no tags -5, enum hint -5, four undocumented -12, no defaults -5
    assert_eq!(completeness.score, 68);
    assert_eq!(
        completeness.details,
        vec![
            "Description is very brief",
            "No tags defined",
            "Variables without descriptions: a, b, c...",
            "Optional variables have no default values",
        ]
    );
    assert!(
        completeness
            .suggestions
            .contains(&"Consider adding enum values for 'format'".to_string())
    );
}

#[test]
fn test_undocumented_penalty_is_capped() {
    let mut builder = TemplateConfig::builder("many")
        .description("Template with many variables")
        .tag("test");
    let mut body = String::new();
    for name in ["a", "b", "c", "d", "e", "f"] {
        builder = builder.variable(VariableDeclaration::new(name));
        body.push_str(&format!("{{{{ {} }}}}", name));
    }
    let config = builder.template(body).build().unwrap();

    let report = scorer().score(&config, &Bindings::new());
    assert_eq!(dimension(&report, QualityDimension::Completeness).score, 85);
}

#[test]
fn test_long_unstructured_template() {
    let config = TemplateConfig::builder("long")
        .description("A long template without structure")
        .tag("long")
        .template("word ".repeat(500))
        .build()
        .unwrap();

    let report = scorer().score(&config, &Bindings::new());

    let completeness = dimension(&report, QualityDimension::Completeness);
    assert_eq!(completeness.score, 90);
    assert!(
        completeness
            .details
            .contains(&"Long template without clear structure".to_string())
    );

    let structure = dimension(&report, QualityDimension::Structure);
    assert_eq!(structure.score, 85);
    assert_eq!(
        structure.details,
        vec![
            "Uses single template format",
            "Long template with minimal structure",
        ]
    );
    assert_eq!(
        structure.suggestions,
        vec![
            "Consider using system_prompt/user_prompt split",
            "Add XML tags or section headers to organize content",
        ]
    );
}

#[test]
fn test_efficiency_repetition_checks() {
    let body = format!("{}{}", "analyze ".repeat(11), "summarize ".repeat(7));
    let config = TemplateConfig::builder("repetitive")
        .template(body)
        .build()
        .unwrap();

    let report = scorer().score(&config, &Bindings::new());
    let efficiency = dimension(&report, QualityDimension::Efficiency);
    assert_eq!(efficiency.score, 90);
    assert!(
        efficiency
            .details
            .contains(&"Frequently repeated words: analyze, summarize".to_string())
    );
    assert_eq!(
        efficiency.suggestions,
        vec!["Review template for unnecessary repetition"]
    );
}

#[test]
fn test_efficiency_variable_usage_and_blocks() {
    let config = TemplateConfig::builder("busy")
        .variable(VariableDeclaration::new("x").with_description("Repeated value"))
        .template(format!(
            "{}{}",
            "{{ x }} ".repeat(6),
            "{% if x %}y{% endif %}".repeat(6)
        ))
        .build()
        .unwrap();

    let report = scorer().score(&config, &Bindings::new());
    let efficiency = dimension(&report, QualityDimension::Efficiency);
    assert_eq!(efficiency.score, 80);
    assert!(efficiency.details.contains(&"Variable 'x' used 6 times".to_string()));
    assert!(
        efficiency
            .details
            .contains(&"High template logic complexity: 12 blocks".to_string())
    );

    let structure = dimension(&report, QualityDimension::Structure);
    assert!(structure.details.contains(&"Nesting depth: 1".to_string()));
}

#[test]
fn test_structure_system_only_and_deep_nesting() {
    let config = TemplateConfig::builder("system-only")
        .system_prompt(
            "{% if a %}{% for x in xs %}{% if x %}{% if b %}deep{% endif %}{% endif %}{% endfor %}{% endif %}",
        )
        .build()
        .unwrap();

    let report = scorer().score(&config, &Bindings::new());
    let structure = dimension(&report, QualityDimension::Structure);
    assert_eq!(structure.score, 75);
    assert_eq!(
        structure.details,
        vec!["Has system_prompt but no user_prompt", "Deep nesting: 4 levels"]
    );
}

#[test]
fn test_split_scores_no_lower_than_single_template() {
    let split = TemplateConfig::builder("split")
        .system_prompt("You are a helpful assistant.")
        .user_prompt("Answer {{ q }}")
        .build()
        .unwrap();
    let single = TemplateConfig::builder("single")
        .template("You are a helpful assistant.Answer {{ q }}")
        .build()
        .unwrap();

    let split = scorer().score(&split, &Bindings::new());
    let single = scorer().score(&single, &Bindings::new());
    assert!(
        dimension(&split, QualityDimension::Structure).score
            >= dimension(&single, QualityDimension::Structure).score
    );
}

#[test]
fn test_scores_are_clamped() {
    let report = scorer().score(&bare_template(), &Bindings::new());
    for score in &report.dimensions {
        assert!(score.score <= 100);
    }
    assert!(report.overall_score <= 100);
}

#[test]
fn test_format_report() {
    let report = scorer().score(&bare_template(), &Bindings::new()).format_report();

    assert!(report.starts_with("Quality Report: bare\n"));
    assert!(report.contains("Overall Score: 83/100 (Grade: B)"));
    assert!(report.contains("  Clarity: 50/100\n    - No clear role definition"));
    // Only the first two details of each dimension are shown.
    assert!(!report.contains("No output format specification"));
    assert!(report.contains("Top Suggestions:\n  1. Add a clear role definition"));
}

#[test]
fn test_report_serializes_with_snake_case_dimensions() {
    let report = scorer().score(&bare_template(), &Bindings::new());
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["grade"], "B");
    assert_eq!(value["overall_score"], 83);
    assert_eq!(value["dimensions"][0]["dimension"], "clarity");
    assert_eq!(value["dimensions"][0]["weight"], 0.25);
}

#[test]
fn test_default_scorer_matches_free_function() {
    let config = bare_template();
    let none = Bindings::new();
    assert_eq!(
        score(&config, &none).grade,
        QualityScorer::default().score(&config, &none).grade
    );
}

#[test]
fn test_sample_values_do_not_change_the_score() {
    let config = bare_template();
    let samples: Bindings = [("text".to_string(), json!("x ".repeat(5000)))]
        .into_iter()
        .collect();

    let without = scorer().score(&config, &Bindings::new());
    let with = scorer().score(&config, &samples);
    assert_eq!(with.overall_score, without.overall_score);
    assert_eq!(with.dimensions, without.dimensions);
}
