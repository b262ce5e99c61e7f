use super::*;
use crate::analyzers::{
    AnalyzerKind, BuildMetrics, DocumentationMetrics, Executable, Report, SourceMetrics,
    StructureMetrics, TestCategory, TestMetrics,
};
use crate::models::FileFacts;

fn facts(paths: &[&str], present: usize) -> Vec<FileFacts> {
    paths
        .iter()
        .enumerate()
        .map(|(i, p)| FileFacts {
            path: p.to_string(),
            exists: i < present,
            size_bytes: if i < present { 10 } else { 0 },
        })
        .collect()
}

fn category(name: &str, present: bool) -> TestCategory {
    TestCategory {
        name: name.to_string(),
        present,
        files: Vec::new(),
    }
}

/// Reports for a project: all critical files, all required docs, nothing else
fn bare_project() -> ReportSet {
    ReportSet {
        structure: Report::new(
            AnalyzerKind::Structure,
            StructureMetrics {
                total_files: 4,
                total_lines: 400,
                directories: Vec::new(),
                critical_files: facts(
                    &["src/main.py", "config.yaml", "README.md", "LICENSE", "app.spec", "requirements.txt"],
                    6,
                ),
            },
            Vec::new(),
        ),
        source: Report::new(
            AnalyzerKind::Source,
            SourceMetrics {
                total_units: 4,
                total_lines: 400,
                total_functions: 8,
                total_classes: 2,
                total_definitions: 10,
                documented_definitions: 5,
                docstring_coverage: 50.0,
                average_file_size: 100.0,
                large_file_threshold: 200,
                large_files: Vec::new(),
                top_imports: Vec::new(),
                parse_failures: 0,
            },
            Vec::new(),
        ),
        documentation: Report::new(
            AnalyzerKind::Documentation,
            DocumentationMetrics {
                documents: Vec::new(),
                required_present: 3,
                required_total: 3,
                optional_present: 0,
                optional_total: 3,
                completeness_score: 100.0,
                total_size_bytes: 0,
                notes: Vec::new(),
            },
            Vec::new(),
        ),
        build: Report::new(
            AnalyzerKind::Build,
            BuildMetrics {
                output_dir: "dist".to_string(),
                output_dir_exists: false,
                executables: Vec::new(),
                packaging_spec: FileFacts::missing("app.spec"),
                installer_script: FileFacts::missing("installer/installer.iss"),
                build_scripts: facts(&["build_simple.py", "build_exe.py", "installer/build_installer.py"], 0),
                test_scripts: facts(&["test_executable.py"], 0),
                distribution_files: facts(&["README.md", "LICENSE", "config.yaml"], 3),
            },
            Vec::new(),
        ),
        tests: Report::new(
            AnalyzerKind::Tests,
            TestMetrics {
                total_test_files: 0,
                source_units: 4,
                categories: ["integration", "unit", "build", "installer", "other"]
                    .iter()
                    .map(|n| category(n, false))
                    .collect(),
                scored_categories: vec!["integration".into(), "build".into(), "installer".into()],
                test_to_source_ratio: 0.0,
                estimated_coverage: 0.0,
            },
            Vec::new(),
        ),
    }
}

/// Reports for a project where every dimension is GOOD
fn complete_project() -> ReportSet {
    let mut reports = bare_project();
    reports.source.metrics.docstring_coverage = 100.0;
    let build = &mut reports.build.metrics;
    build.packaging_spec.exists = true;
    build.installer_script.exists = true;
    build.build_scripts = facts(&["build_simple.py", "build_exe.py", "installer/build_installer.py"], 3);
    build.output_dir_exists = true;
    build.executables.push(Executable {
        name: "App.exe".into(),
        path: "dist/App.exe".into(),
        size_bytes: 1 << 20,
    });
    for c in &mut reports.tests.metrics.categories {
        c.present = true;
    }
    reports
}

fn verdict(reports: &ReportSet) -> ReadinessVerdict {
    ReadinessScorer::new(reports).calculate()
}

#[test]
fn test_bare_project_scenario() {
    let v = verdict(&bare_project());
    let score = |d: Dimension| v.dimension(d).unwrap().score;

    assert_eq!(score(Dimension::CoreFunctionality), 100.0);
    assert_eq!(score(Dimension::DocumentationQuality), 100.0);
    assert_eq!(score(Dimension::BuildSystem), 0.0);
    assert_eq!(score(Dimension::TestCoverage), 0.0);
    // mean(50, 100)
    assert_eq!(score(Dimension::CodeQuality), 75.0);
    assert_eq!(score(Dimension::DeploymentReadiness), 70.0);

    // (100 + 100 + 0 + 0 + 75 + 70) / 6 = 57.5
    assert_eq!(v.overall_score, 57.5);
    assert!(v.overall_score < 80.0);
    assert_eq!(v.tier, Tier::NotReady);

    assert!(v
        .recommendations
        .contains(&Dimension::BuildSystem.remediation().to_string()));
    assert!(v
        .recommendations
        .contains(&Dimension::TestCoverage.remediation().to_string()));
}

#[test]
fn test_recommendations_follow_declaration_order() {
    let v = verdict(&bare_project());
    assert_eq!(
        v.recommendations,
        vec![
            Dimension::BuildSystem.remediation().to_string(),
            Dimension::TestCoverage.remediation().to_string(),
            Dimension::DeploymentReadiness.remediation().to_string(),
        ]
    );
}

#[test]
fn test_complete_project_is_ready() {
    let v = verdict(&complete_project());
    assert!(v.dimensions.iter().all(|d| d.is_good()));
    assert_eq!(v.overall_score, 100.0);
    assert_eq!(v.tier, Tier::Ready);
    assert_eq!(v.recommendations, vec![ALL_CLEAR_MESSAGE.to_string()]);
}

#[test]
fn test_verdict_always_has_six_dimensions_in_range() {
    for reports in [bare_project(), complete_project()] {
        let v = verdict(&reports);
        assert_eq!(v.dimensions.len(), 6);
        let order: Vec<Dimension> = v.dimensions.iter().map(|d| d.dimension).collect();
        assert_eq!(order, Dimension::ALL.to_vec());
        for d in &v.dimensions {
            assert!((0.0..=100.0).contains(&d.score), "{} out of range", d.dimension);
        }
        let mean: f64 = v.dimensions.iter().map(|d| d.score).sum::<f64>() / 6.0;
        assert_eq!(v.overall_score, round_to(mean, 1));
    }
}

#[test]
fn test_status_uses_dimension_threshold() {
    // Table-driven: (dimension, score, expected status)
    let cases = [
        (Dimension::CoreFunctionality, 80.0, Status::Good),
        (Dimension::CoreFunctionality, 79.9, Status::NeedsImprovement),
        (Dimension::TestCoverage, 66.7, Status::Good),
        (Dimension::TestCoverage, 65.9, Status::NeedsImprovement),
        (Dimension::CodeQuality, 70.0, Status::Good),
        (Dimension::CodeQuality, 69.9, Status::NeedsImprovement),
        (Dimension::DeploymentReadiness, 70.0, Status::NeedsImprovement),
    ];
    for (dimension, score, expected) in cases {
        let s = DimensionScore::new(
            dimension,
            Measurement {
                score,
                detail: String::new(),
            },
        );
        assert_eq!(s.status, expected, "{} at {}", dimension, score);
    }
}

#[test]
fn test_tier_boundaries_are_closed_above() {
    assert_eq!(Tier::from_score(100.0), Tier::Ready);
    assert_eq!(Tier::from_score(90.0), Tier::Ready);
    assert_eq!(Tier::from_score(89.9), Tier::AlmostReady);
    assert_eq!(Tier::from_score(80.0), Tier::AlmostReady);
    assert_eq!(Tier::from_score(79.9), Tier::NeedsWork);
    assert_eq!(Tier::from_score(70.0), Tier::NeedsWork);
    assert_eq!(Tier::from_score(69.9), Tier::NotReady);
    assert_eq!(Tier::from_score(0.0), Tier::NotReady);
}

#[test]
fn test_overall_is_rounded_before_classification() {
    // Mean 89.96 rounds to 90.0 and is READY
    let scores = [89.96; 6];
    let dimensions = Dimension::ALL
        .iter()
        .zip(scores)
        .map(|(d, score)| {
            DimensionScore::new(
                *d,
                Measurement {
                    score,
                    detail: String::new(),
                },
            )
        })
        .collect();
    let v = ReadinessVerdict::from_scores(dimensions);
    assert_eq!(v.overall_score, 90.0);
    assert_eq!(v.tier, Tier::Ready);
}

#[test]
fn test_detail_strings() {
    let v = verdict(&bare_project());
    let detail = |d: Dimension| v.dimension(d).unwrap().detail.clone();
    assert_eq!(detail(Dimension::CoreFunctionality), "6/6 critical files present");
    assert_eq!(detail(Dimension::BuildSystem), "0/5 build files present");
    assert_eq!(detail(Dimension::TestCoverage), "0/3 test categories implemented");
    assert_eq!(
        detail(Dimension::CodeQuality),
        "docstring coverage 50.0%, average file size 100.0 lines"
    );
    assert_eq!(
        detail(Dimension::DeploymentReadiness),
        "3/3 distribution files, executable missing"
    );
}

#[test]
fn test_verdict_serialization_uses_upper_case_labels() {
    let v = verdict(&bare_project());
    let value = serde_json::to_value(&v).unwrap();
    assert_eq!(value["tier"], "NOT_READY");
    assert_eq!(value["dimensions"][0]["dimension"], "core_functionality");
    assert_eq!(value["dimensions"][2]["status"], "NEEDS_IMPROVEMENT");
}
