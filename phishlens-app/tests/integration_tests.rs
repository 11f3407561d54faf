//! End-to-end integration tests for PhishLens
//!
//! These exercise the full scan pipeline in-process:
//! - URL scan → scan log → auto-blacklist → threat record
//! - exact-blacklist short-circuit on rescan
//! - email scan → threat record without blacklisting
//! - dashboard aggregation and persistence snapshot/restore cycles

use std::sync::Arc;

use phishlens_app::dashboard::DashboardReport;
use phishlens_app::scanner::ScanService;
use phishlens_core::persistence::PersistenceManager;
use phishlens_core::types::*;
use phishlens_intel::{IndicatorStore, ScanLog, ThreatLog};

fn service() -> ScanService {
    ScanService::new(
        Arc::new(IndicatorStore::new()),
        Arc::new(ScanLog::new()),
        Arc::new(ThreatLog::new()),
    )
}

// ── Scenario 1: URL detection → blacklist → blocked rescan ───────────────

#[test]
fn phishing_url_is_logged_blacklisted_and_then_blocked() {
    let svc = service();
    let url = "http://192.168.1.1/login.php";

    let report = svc.scan_url(url, Some("alice"), Some("203.0.113.5"));
    assert!(!report.blocked);
    assert!(report.verdict);
    assert_eq!(report.score, 40);

    // One scan record, one indicator, one threat record.
    assert_eq!(svc.scans.len(), 1);
    assert_eq!(svc.scans.threat_count(), 1);
    assert_eq!(svc.intel.len(), 1);
    assert_eq!(svc.threats.len(), 1);

    let indicator = svc
        .intel
        .find_active_exact(IndicatorType::Url, url)
        .expect("URL should be auto-blacklisted");
    assert_eq!(indicator.threat_type, "phishing");
    assert_eq!(indicator.severity, Severity::Medium); // score 40 < 70
    assert_eq!(indicator.source, "URL Scanner");

    let threat = &svc.threats.recent(1)[0];
    assert_eq!(threat.threat_type, "phishing");
    assert_eq!(threat.status, ThreatStatus::Detected);
    assert_eq!(threat.confidence_score, 40);
    assert_eq!(threat.url.as_deref(), Some(url));
    assert_eq!(threat.source_ip.as_deref(), Some("203.0.113.5"));
    assert_eq!(threat.reported_by.as_deref(), Some("alice"));

    // Rescan: the exact blacklist check fires before the engine.
    let rescan = svc.scan_url(url, Some("bob"), None);
    assert!(rescan.blocked);
    assert!(rescan.verdict);
    assert_eq!(rescan.score, 100);
    assert_eq!(rescan.risk_level, RiskLevel::High);
    assert_eq!(rescan.alerts, vec!["URL is blacklisted and blocked"]);

    // The blocked attempt is still logged, but nothing else is written.
    assert_eq!(svc.scans.len(), 2);
    assert_eq!(svc.intel.len(), 1);
    assert_eq!(svc.threats.len(), 1);
}

#[test]
fn clean_url_writes_only_a_scan_record() {
    let svc = service();
    let report = svc.scan_url("https://www.google.com", None, None);
    assert!(!report.verdict);
    assert_eq!(report.score, 0);

    assert_eq!(svc.scans.len(), 1);
    assert_eq!(svc.scans.threat_count(), 0);
    assert!(svc.intel.is_empty());
    assert!(svc.threats.is_empty());
}

#[test]
fn high_confidence_url_gets_high_severity() {
    let svc = service();
    // IP host (+30) + login/verify/account/update keywords (+40) = 70.
    let report = svc.scan_url("http://192.0.2.77/login-verify-account-update", None, None);
    assert_eq!(report.score, 70);

    let threat = &svc.threats.recent(1)[0];
    assert_eq!(threat.severity, Severity::High);
    let indicator = &svc.intel.recent(1)[0];
    assert_eq!(indicator.severity, Severity::High);
}

// ── Scenario 2: threat-intel substring boost ─────────────────────────────

#[test]
fn seeded_intel_flags_lookalike_hosts() {
    let svc = service();
    svc.intel
        .insert(NewIndicator {
            indicator_type: IndicatorType::Url,
            value: "bad.example".into(),
            threat_type: "phishing".into(),
            severity: Severity::High,
            description: "feed import".into(),
            source: "Feed".into(),
        })
        .unwrap();

    let report = svc.scan_url("http://portal.bad.example/", None, None);
    assert!(!report.blocked); // not an exact value match
    assert!(report.verdict);
    assert_eq!(report.score, 50);
    assert!(report
        .alerts
        .iter()
        .any(|a| a == "URL matches known threat intelligence"));

    // The full URL is now blacklisted alongside the seed indicator.
    assert_eq!(svc.intel.len(), 2);
    let rescan = svc.scan_url("http://portal.bad.example/", None, None);
    assert!(rescan.blocked);
}

#[test]
fn duplicate_auto_blacklist_is_non_fatal() {
    let svc = service();
    let url = "http://10.0.0.1/login";

    // Pair already exists but is inactive, so the exact check misses and
    // the engine's auto-blacklist insert collides.
    let id = svc
        .intel
        .insert(NewIndicator {
            indicator_type: IndicatorType::Url,
            value: url.into(),
            threat_type: "phishing".into(),
            severity: Severity::Low,
            description: "stale entry".into(),
            source: "Feed".into(),
        })
        .unwrap();
    svc.intel.deactivate(id).unwrap();

    let report = svc.scan_url(url, None, None);
    assert!(report.verdict);

    // The duplicate insert was swallowed; the threat is still recorded.
    assert_eq!(svc.intel.len(), 1);
    assert_eq!(svc.threats.len(), 1);
    assert_eq!(svc.scans.len(), 1);
}

// ── Scenario 3: email scans ──────────────────────────────────────────────

#[test]
fn spam_email_records_threat_but_no_indicator() {
    let svc = service();
    let report = svc.scan_email(
        "You win a free prize",
        "Send cash to claim your lottery money",
        Some("carol"),
        None,
    );
    assert!(report.verdict);

    assert_eq!(svc.scans.len(), 1);
    assert_eq!(svc.scans.recent(1)[0].target, "Subject: You win a free prize");
    assert!(svc.intel.is_empty());

    let threat = &svc.threats.recent(1)[0];
    assert_eq!(threat.threat_type, "spam");
    assert_eq!(threat.detection_method, "Email Scanner");
    assert!(threat.url.is_none());
}

#[test]
fn clean_email_only_logs_the_scan() {
    let svc = service();
    let report = svc.scan_email("Lunch tomorrow?", "Does noon work for you?", None, None);
    assert!(!report.verdict);
    assert_eq!(svc.scans.len(), 1);
    assert_eq!(svc.scans.threat_count(), 0);
    assert!(svc.threats.is_empty());
}

// ── Scenario 4: dashboard aggregation ────────────────────────────────────

#[test]
fn dashboard_reflects_scan_activity() {
    let svc = service();
    svc.scan_url("https://www.google.com", None, None);
    svc.scan_url("http://192.168.1.1/login.php", None, None);
    svc.scan_email("win free cash now", "click here for your prize", None, None);

    let start = chrono::Utc::now().timestamp() - 60;
    let report = DashboardReport::build(&svc.intel, &svc.scans, &svc.threats, start);

    assert_eq!(report.total_scans, 3);
    assert_eq!(report.threats_detected, 2);
    assert_eq!(report.active_indicators, 1);
    assert!(report.uptime_secs >= 60);
    assert_eq!(report.threat_stats.phishing, 1);
    assert_eq!(report.threat_stats.spam, 1);
    assert_eq!(report.threat_stats.detected, 2);
    assert_eq!(report.recent_threats.len(), 2);
    // Most recent first: the spam detection came last.
    assert_eq!(report.recent_threats[0].threat_type, "spam");

    assert_eq!(report.activity.len(), 7);
    let today = report.activity.last().unwrap();
    assert_eq!(today.scans, 3);
    assert_eq!(today.threats, 2);
}

// ── Scenario 5: persistence cycle ────────────────────────────────────────

#[test]
fn scan_state_survives_snapshot_and_restore() {
    let dir = std::env::temp_dir().join("phishlens_integration_persist");
    let _ = std::fs::remove_dir_all(&dir);

    let intel = Arc::new(IndicatorStore::new());
    let scans = Arc::new(ScanLog::new());
    let threats = Arc::new(ThreatLog::new());

    let mgr = PersistenceManager::new(&dir, true);
    mgr.init().unwrap();
    mgr.register(intel.clone());
    mgr.register(scans.clone());
    mgr.register(threats.clone());

    let svc = ScanService::new(intel, scans, threats);
    svc.scan_url("http://192.168.1.1/login.php", Some("alice"), None);
    svc.scan_email("win free cash", "lottery prize money", None, None);

    for (_, result) in mgr.snapshot_all() {
        result.unwrap();
    }

    // Fresh stores, fresh manager over the same directory.
    let intel2 = Arc::new(IndicatorStore::new());
    let scans2 = Arc::new(ScanLog::new());
    let threats2 = Arc::new(ThreatLog::new());
    let mgr2 = PersistenceManager::new(&dir, true);
    mgr2.register(intel2.clone());
    mgr2.register(scans2.clone());
    mgr2.register(threats2.clone());
    for (_, result) in mgr2.restore_all() {
        assert!(result.unwrap());
    }

    assert_eq!(scans2.len(), 2);
    assert_eq!(threats2.len(), 2);
    assert_eq!(intel2.len(), 1);

    // Restored blacklist still blocks the rescan.
    let svc2 = ScanService::new(intel2, scans2, threats2);
    let rescan = svc2.scan_url("http://192.168.1.1/login.php", None, None);
    assert!(rescan.blocked);

    let _ = std::fs::remove_dir_all(&dir);
}

// ── Scenario 6: operator status lifecycle ────────────────────────────────

#[test]
fn operator_walks_threat_through_lifecycle() {
    let svc = service();
    svc.scan_url("http://192.168.1.1/login.php", None, None);
    let id = svc.threats.recent(1)[0].id;

    for status in [
        ThreatStatus::Analyzing,
        ThreatStatus::Contained,
        ThreatStatus::Resolved,
    ] {
        svc.threats.set_status(id, status).unwrap();
        assert_eq!(svc.threats.get(id).unwrap().status, status);
    }

    let stats = svc.threats.stats();
    assert_eq!(stats.resolved, 1);
    assert_eq!(stats.unresolved, 0);
}
