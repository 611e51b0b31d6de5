// tests/config_wiring.rs
//
// Config file + env -> analyzer/history wiring. Env-mutating, hence #[serial].

use std::fs;

use serial_test::serial;

use fake_news_analyzer::analyze::fact_check::ENV_TEST_MODE;
use fake_news_analyzer::config::analyzer::{ENV_API_KEY, ENV_CONFIG_PATH, ENV_JITTER};
use fake_news_analyzer::{build_state, AnalyzerConfig, Verdict};

fn clear_env() {
    for k in [ENV_CONFIG_PATH, ENV_API_KEY, ENV_JITTER, ENV_TEST_MODE] {
        std::env::remove_var(k);
    }
}

#[tokio::test]
#[serial]
async fn config_file_drives_state() {
    clear_env();
    let tmp = tempfile::tempdir().unwrap();
    let history = tmp.path().join("history.json");
    let cfg_path = tmp.path().join("analyzer.toml");
    fs::write(
        &cfg_path,
        format!(
            "jitter_amplitude = 0.0\nhistory_capacity = 2\nhistory_path = {:?}\n[fact_check]\napi_key = \"ENV\"\n",
            history.display().to_string()
        ),
    )
    .unwrap();
    std::env::set_var(ENV_CONFIG_PATH, &cfg_path);

    let cfg = AnalyzerConfig::load_default().expect("config loads");
    assert_eq!(cfg.jitter_amplitude, 0.0);
    assert!(cfg.fact_check.api_key.is_empty());

    let state = build_state(&cfg);
    assert!(!state.analyzer.fact_checker().is_available());
    assert_eq!(state.analyzer.jitter_amplitude(), 0.0);

    for _ in 0..3 {
        let r = state.analyzer.analyze("The council met today.").await;
        assert_eq!(r.verdict, Verdict::Uncertain);
        state.history.push(r);
    }
    assert_eq!(state.history.len(), 2);
    assert!(history.exists());
    clear_env();
}

#[tokio::test]
#[serial]
async fn mock_mode_returns_canned_false_claim() {
    clear_env();
    std::env::set_var(ENV_TEST_MODE, "mock");
    std::env::set_var(ENV_JITTER, "0");

    let cfg = AnalyzerConfig::default().finalize();
    let state = build_state(&cfg);
    assert!(state.analyzer.fact_checker().is_available());

    let r = state
        .analyzer
        .analyze("BREAKING: Scientists SHOCKING discovery!!! You won't believe what happens next!")
        .await;
    let fc = r.fact_check.as_ref().expect("mock fact-check ran");
    assert_eq!(fc.claims.len(), 1);
    assert_eq!(fc.claims[0].rating, "False");
    assert_eq!(r.scores.fact_check, Some(90.0));
    assert_eq!(r.verdict, Verdict::Fake);
    clear_env();
}
