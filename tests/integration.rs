//! End-to-end pipeline tests over real files in temporary directories.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, TimeZone, Timelike};
use tempfile::{TempDir, tempdir};

use chat_timeline::core::output::{ALL_MESSAGES_FILE, SUMMARY_STATS_FILE, year_file_name};
use chat_timeline::prelude::*;

// ============================================================================
// Fixtures
// ============================================================================

const WHATSAPP: &str = "\
[1/15/2024, 10:30:00] You: Good morning
this continues
  and ends here
15/01/2024, 10:45 - Partner: <Media omitted>
[12/31/2023, 23:59:00] Partner: Happy new year!
[1/15/2024, 11:00:00] You: Missed voice call
";

// 2024-06-15T12:00:00Z and one minute later: mid-year in every timezone.
const INSTAGRAM: &str = r#"{
  "participants": [{"name": "Partner"}, {"name": "You"}],
  "messages": [
    {"sender_name": "You", "timestamp_ms": 1718452860000, "content": "nice"},
    {"sender_name": "Partner", "timestamp_ms": 1718452800000,
     "photos": [{"uri": "a.jpg"}, {"uri": "b.jpg"}, {"uri": "c.jpg"}]}
  ]
}"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("raw")).unwrap();
        Self { dir }
    }

    fn with_exports() -> Self {
        let ws = Self::new();
        ws.write_raw("whatsapp.txt", WHATSAPP);
        ws.write_raw("instagram_message_1.json", INSTAGRAM);
        ws
    }

    fn write_raw(&self, name: &str, content: &str) {
        fs::write(self.dir.path().join("raw").join(name), content).unwrap();
    }

    fn write_timezone_config(&self, content: &str) {
        let config_dir = self.dir.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("timezone_config.json"), content).unwrap();
    }

    fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_source_dir(self.dir.path().join("raw"))
            .with_output_dir(self.out())
            .with_config_dir(self.dir.path().join("config"))
    }

    fn run(&self) -> RunReport {
        Pipeline::new(self.config()).run().unwrap()
    }

    fn read_events(&self, name: &str) -> Vec<Event> {
        read_events(&self.out().join(name))
    }
}

fn read_events(path: &Path) -> Vec<Event> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn local(ms: i64) -> chrono::NaiveDateTime {
    Local.timestamp_millis_opt(ms).single().unwrap().naive_local()
}

// ============================================================================
// Full run
// ============================================================================

#[test]
fn test_full_run_writes_all_artifacts() {
    let ws = Workspace::with_exports();
    let report = ws.run();

    assert!(report.is_success());
    assert_eq!(report.events, 6);
    assert_eq!(report.dropped(), 0);
    assert!(report.sources.iter().all(|s| s.status == SourceStatus::Parsed));

    for name in [
        ALL_MESSAGES_FILE.to_string(),
        SUMMARY_STATS_FILE.to_string(),
        year_file_name(2023),
        year_file_name(2024),
    ] {
        assert!(ws.out().join(&name).exists(), "missing {name}");
    }
    assert_eq!(report.export.written.len(), 4);
}

#[test]
fn test_multiline_whatsapp_message() {
    let ws = Workspace::with_exports();
    ws.run();

    let all = ws.read_events(ALL_MESSAGES_FILE);
    let morning = all
        .iter()
        .find(|e| e.content.starts_with("Good morning"))
        .unwrap();
    assert_eq!(morning.content, "Good morning\nthis continues\nand ends here");
    assert_eq!(morning.kind, EventKind::Text);
}

#[test]
fn test_instagram_photos_and_timestamps() {
    let ws = Workspace::with_exports();
    ws.run();

    let all = ws.read_events(ALL_MESSAGES_FILE);
    let photo = all
        .iter()
        .find(|e| e.platform == Platform::Instagram && e.kind == EventKind::Image)
        .unwrap();
    assert_eq!(photo.media_count, 3);
    assert_eq!(photo.content, "[3 photo(s)]");
    assert_eq!(photo.sender_id, "Partner");
    assert_eq!(photo.timestamp, local(1718452800000));
}

#[test]
fn test_output_sorted_with_latency() {
    let ws = Workspace::with_exports();
    ws.run();

    let all = ws.read_events(ALL_MESSAGES_FILE);
    assert!(all.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(all[0].content, "Happy new year!");
    assert_eq!(all[0].reply_latency_seconds, None);

    for w in all.windows(2) {
        if w[0].sender_id == w[1].sender_id {
            assert_eq!(w[1].reply_latency_seconds, None);
        } else {
            let gap = (w[1].timestamp - w[0].timestamp).num_seconds() as f64;
            assert_eq!(w[1].reply_latency_seconds, Some(gap));
        }
    }

    // 10:30 You -> 10:45 Partner
    let media = all.iter().find(|e| e.content == "<Media omitted>").unwrap();
    assert_eq!(media.reply_latency_seconds, Some(900.0));
    assert_eq!(media.media_count, 1);
}

#[test]
fn test_partitions_reassemble_full_dataset() {
    let ws = Workspace::with_exports();
    ws.run();

    let all = ws.read_events(ALL_MESSAGES_FILE);
    let mut joined = ws.read_events(&year_file_name(2023));
    joined.extend(ws.read_events(&year_file_name(2024)));

    assert_eq!(joined, all);
    assert!(ws.read_events(&year_file_name(2023)).iter().all(|e| e.year() == 2023));
}

#[test]
fn test_rerun_is_byte_identical() {
    let ws = Workspace::with_exports();
    let names = [
        ALL_MESSAGES_FILE.to_string(),
        SUMMARY_STATS_FILE.to_string(),
        year_file_name(2023),
        year_file_name(2024),
    ];
    let snapshot = || -> Vec<Vec<u8>> {
        names
            .iter()
            .map(|name| fs::read(ws.out().join(name)).unwrap())
            .collect()
    };

    ws.run();
    let first = snapshot();
    ws.run();
    let second = snapshot();

    assert_eq!(first, second);
}

#[test]
fn test_rerun_removes_stale_year_partitions() {
    let ws = Workspace::with_exports();
    fs::create_dir_all(ws.out()).unwrap();
    fs::write(ws.out().join(year_file_name(2019)), "[]").unwrap();

    let report = ws.run();

    assert!(report.is_success());
    assert!(!ws.out().join(year_file_name(2019)).exists());
    assert!(ws.out().join(year_file_name(2023)).exists());
    assert!(ws.out().join(year_file_name(2024)).exists());
}

#[test]
fn test_blocked_full_dataset_still_writes_other_artifacts() {
    let ws = Workspace::with_exports();
    let blocked = ws.out().join(ALL_MESSAGES_FILE);
    fs::create_dir_all(&blocked).unwrap();
    fs::write(blocked.join("occupied"), "x").unwrap();

    let report = ws.run();

    assert!(!report.is_success());
    assert_eq!(report.export.failures.len(), 1);
    assert!(report.export.failures[0].is_write());
    assert!(blocked.is_dir());

    assert_eq!(ws.read_events(&year_file_name(2023)).len(), 1);
    assert_eq!(ws.read_events(&year_file_name(2024)).len(), 5);
    assert!(ws.out().join(SUMMARY_STATS_FILE).is_file());
    assert_eq!(report.export.written.len(), 3);
}

#[test]
fn test_summary_stats_file() {
    let ws = Workspace::with_exports();
    let report = ws.run();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(ws.out().join(SUMMARY_STATS_FILE)).unwrap())
            .unwrap();

    assert_eq!(value["total_messages"], 6);
    assert_eq!(value["by_platform"]["whatsapp"], 4);
    assert_eq!(value["by_platform"]["instagram"], 2);
    assert_eq!(value["by_type"]["call"], 1);
    assert_eq!(value["date_range"]["start"], "2023-12-31T23:59:00");
    assert_eq!(report.stats.by_sender.values().sum::<usize>(), 6);
    assert!(report.stats.messages_per_day.is_finite());
}

// ============================================================================
// Timezone handling
// ============================================================================

#[test]
fn test_without_timezone_config_hours_are_absent() {
    let ws = Workspace::with_exports();
    let report = ws.run();

    assert!(!report.timezone_applied);
    let raw = fs::read_to_string(ws.out().join(ALL_MESSAGES_FILE)).unwrap();
    assert!(!raw.contains("hour_of_day_local"));
}

#[test]
fn test_timezone_config_sets_hours() {
    let ws = Workspace::with_exports();
    ws.write_timezone_config(r#"{"platform_offsets_minutes": {"whatsapp": 60}, "note": "kept"}"#);
    let report = ws.run();

    assert!(report.timezone_applied);
    let all = ws.read_events(ALL_MESSAGES_FILE);
    assert!(all.iter().all(|e| e.hour_of_day_local.is_some()));

    let morning = all.iter().find(|e| e.content.starts_with("Good morning")).unwrap();
    assert_eq!(morning.hour_of_day_local, Some(11));
    let new_year = all.iter().find(|e| e.content == "Happy new year!").unwrap();
    assert_eq!(new_year.hour_of_day_local, Some(0));

    let photo = all.iter().find(|e| e.kind == EventKind::Image && e.platform == Platform::Instagram).unwrap();
    assert_eq!(photo.hour_of_day_local, Some(local(1718452800000).hour()));
}

#[test]
fn test_empty_timezone_config_skips_normalization() {
    let ws = Workspace::with_exports();
    ws.write_timezone_config("{}");
    let report = ws.run();

    assert!(!report.timezone_applied);
    let raw = fs::read_to_string(ws.out().join(ALL_MESSAGES_FILE)).unwrap();
    assert!(!raw.contains("hour_of_day_local"));
}

#[test]
fn test_mistyped_offsets_are_ignored() {
    for doc in [
        r#"{"platform_offsets_minutes": null}"#,
        r#"{"platform_offsets_minutes": "UTC+2"}"#,
    ] {
        let ws = Workspace::with_exports();
        ws.write_timezone_config(doc);
        let report = ws.run();

        assert!(report.timezone_applied, "{doc}");
        let all = ws.read_events(ALL_MESSAGES_FILE);
        let morning = all.iter().find(|e| e.content.starts_with("Good morning")).unwrap();
        assert_eq!(morning.hour_of_day_local, Some(10), "{doc}");
    }
}

// ============================================================================
// Degenerate inputs
// ============================================================================

#[test]
fn test_missing_sources_empty_dataset() {
    let ws = Workspace::new();
    let err = Pipeline::new(ws.config()).run().unwrap_err();

    assert!(err.is_empty_dataset());
    assert!(!ws.out().exists());
}

#[test]
fn test_one_missing_source_is_tolerated() {
    let ws = Workspace::new();
    ws.write_raw("whatsapp.txt", WHATSAPP);
    let report = ws.run();

    assert_eq!(report.events, 4);
    assert_eq!(report.sources[1].status, SourceStatus::Missing);
    assert!(report.is_success());
}

#[test]
fn test_multiple_instagram_files_and_aliases() {
    let ws = Workspace::new();
    ws.write_raw(
        "message_1.json",
        r#"{"messages": [{"sender_name": "sam.ig", "timestamp_ms": 1718452800000, "content": "one"}]}"#,
    );
    ws.write_raw(
        "message_2.json",
        r#"{"messages": [{"sender_name": "alex", "timestamp_ms": 1718452900000, "content": "two"}]}"#,
    );

    let participants = Participants::new("me", "them")
        .with_first(Participant::new("me").with_alias("alex"))
        .with_second(Participant::new("them").with_alias("sam.ig"));
    let config = ws
        .config()
        .with_whatsapp_files(Vec::new())
        .with_instagram_files(vec!["message_1.json".into(), "message_2.json".into()])
        .with_participants(participants);

    let report = Pipeline::new(config).run().unwrap();
    assert_eq!(report.sources.len(), 2);

    let all = ws.read_events(ALL_MESSAGES_FILE);
    let senders: Vec<&str> = all.iter().map(|e| e.sender_id.as_str()).collect();
    assert_eq!(senders, ["them", "me"]);
    assert_eq!(all[1].reply_latency_seconds, Some(100.0));
}

#[test]
fn test_dropped_records_counted() {
    let ws = Workspace::new();
    ws.write_raw(
        "whatsapp.txt",
        "Messages and calls are end-to-end encrypted.\n\
         [1/15/2024, 10:30:00] You: ok\n\
         [99/99/2024, 10:31:00] You: bad date\n",
    );
    let report = ws.run();

    assert_eq!(report.events, 1);
    assert_eq!(report.dropped(), 2);
}
