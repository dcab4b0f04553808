//! Integration tests: end-to-end arbitration sequences.
//!
//! These drive `LightEngine` through the public API against both the
//! in-memory `MockSink` and a temporary sysfs tree, checking which writes
//! reach the hardware and in what order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lightd_lib::config::Config;
use lightd_lib::handler::NOTIFICATION_CHANNEL;
use lightd_lib::hooks::FaultCounter;
use lightd_lib::registry::BackendTable;
use lightd_lib::request::parse_request;
use lightd_lib::sink::mock::{MockSink, SinkWrite};
use lightd_lib::sink::{NODE_BREATH, NODE_BRIGHTNESS, NODE_MAX_BRIGHTNESS, SysfsSink};
use lightd_lib::{FlashMode, LightEngine, LightState, LightType, Status};

const CH: &str = NOTIFICATION_CHANNEL;

fn make_engine() -> LightEngine<MockSink> {
    LightEngine::new(&BackendTable::default(), MockSink::new())
}

/// Helper: a sysfs tree with only the fallback LED present.
fn make_sysfs(root: &Path, max: u32) -> PathBuf {
    let dir = root.join("sys/class/leds/white");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(NODE_MAX_BRIGHTNESS), format!("{max}\n")).unwrap();
    dir
}

fn read_node(dir: &Path, node: &str) -> String {
    std::fs::read_to_string(dir.join(node)).unwrap()
}

// ── Test: incoming call → charging → missed call cleared ──

#[test]
fn notification_lifecycle() {
    let engine = make_engine();

    // 1. Battery charging: steady green
    engine.set_light(LightType::Battery, LightState::new(0xFF00_FF00));
    assert_eq!(
        engine.sink().take_writes(),
        vec![
            SinkWrite::breath(CH, false),
            SinkWrite::brightness(CH, 0),
            SinkWrite::brightness(CH, 149),
        ]
    );

    // 2. Notification arrives: timed blink takes over
    let blink = LightState::new(0xFFFF_FFFF).with_flash(FlashMode::Timed, 1000, 4000);
    engine.set_light(LightType::Notifications, blink);
    assert_eq!(
        engine.sink().take_writes(),
        vec![
            SinkWrite::breath(CH, false),
            SinkWrite::brightness(CH, 0),
            SinkWrite::breath(CH, true),
        ]
    );

    // 3. Battery update while notification is showing: suppressed
    engine.set_light(LightType::Battery, LightState::new(0xFFFF_0000));
    assert!(engine.sink().take_writes().is_empty());

    // 4. Notification dismissed: the latest battery state comes back
    engine.set_light(LightType::Notifications, LightState::default());
    assert_eq!(
        engine.sink().take_writes(),
        vec![
            SinkWrite::breath(CH, false),
            SinkWrite::brightness(CH, 0),
            SinkWrite::brightness(CH, 76),
        ]
    );

    // 5. Battery off: everything dark, breathing disabled
    engine.set_light(LightType::Battery, LightState::new(0));
    assert_eq!(
        engine.sink().take_writes(),
        vec![SinkWrite::breath(CH, false), SinkWrite::brightness(CH, 0)]
    );
}

#[test]
fn repeated_requests_render_once() {
    let engine = make_engine();
    let state = LightState::new(0xFF20_40FF).with_flash(FlashMode::Hardware, 0, 0);
    for _ in 0..5 {
        assert_eq!(engine.set_light(LightType::Attention, state), Status::Success);
    }
    assert_eq!(engine.sink().read_count(), 1);
    assert_eq!(engine.sink().writes().len(), 3);
}

#[test]
fn unsupported_types_rejected_for_every_non_table_type() {
    let engine = make_engine();
    let supported = engine.supported_types();
    for ty in LightType::ALL {
        let status = engine.set_light(ty, LightState::new(0xFFFF_FFFF));
        if supported.contains(&ty) {
            assert_eq!(status, Status::Success, "{ty}");
        } else {
            assert_eq!(status, Status::LightNotSupported, "{ty}");
            assert_eq!(engine.lookup(ty), None);
        }
    }
}

// ── Concurrency ──

#[test]
fn concurrent_requests_apply_atomically() {
    let engine = Arc::new(make_engine());
    let requests = [
        (LightType::Attention, LightState::new(0xFFFF_0000)),
        (LightType::Notifications, LightState::new(0xFF00_FF00)),
        (LightType::Battery, LightState::new(0xFF00_00FF)),
    ];

    std::thread::scope(|s| {
        for (ty, state) in requests {
            let engine = Arc::clone(&engine);
            s.spawn(move || {
                for _ in 0..200 {
                    engine.set_light(ty, LightState::default());
                    engine.set_light(ty, state);
                }
            });
        }
    });

    for (ty, state) in requests {
        assert_eq!(engine.lookup(ty), Some(state));
    }
    // Whatever the interleaving, the last render is the final winner.
    assert_eq!(
        engine.resolved(LightType::Battery),
        Some(LightState::new(0xFFFF_0000))
    );
    assert_eq!(
        engine.sink().writes().last(),
        Some(&SinkWrite::brightness(CH, 76))
    );
}

#[test]
fn concurrent_writes_are_never_interleaved() {
    let engine = Arc::new(make_engine());
    std::thread::scope(|s| {
        for (i, ty) in [LightType::Attention, LightType::Battery].into_iter().enumerate() {
            let engine = Arc::clone(&engine);
            s.spawn(move || {
                for n in 0..100u32 {
                    let color = 0xFF00_0000 | ((0x80 + n) << (8 * i));
                    engine.set_light(ty, LightState::new(color));
                }
            });
        }
    });

    // Every render is breath(false), brightness(0), brightness(v): each
    // group of three must stay contiguous.
    let writes = engine.sink().writes();
    assert_eq!(writes.len() % 3, 0);
    for group in writes.chunks(3) {
        assert_eq!(group[0], SinkWrite::breath(CH, false));
        assert_eq!(group[1], SinkWrite::brightness(CH, 0));
        assert!(matches!(group[2], SinkWrite::Brightness { .. }));
    }
}

// ── Sysfs end-to-end ──

#[test]
fn sysfs_sink_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let led = make_sysfs(tmp.path(), 255);
    let sink = Config::default().sysfs_sink().with_root(tmp.path());
    let engine = LightEngine::new(&BackendTable::default(), sink);

    engine.set_light(LightType::Notifications, LightState::new(0xFFFF_FFFF));
    assert_eq!(read_node(&led, NODE_BRIGHTNESS), "255");
    assert_eq!(read_node(&led, NODE_BREATH), "0");

    let request = parse_request("attention #FFFF0000 hardware").unwrap().unwrap();
    engine.set_light(request.light_type, request.state);
    assert_eq!(read_node(&led, NODE_BRIGHTNESS), "0");
    assert_eq!(read_node(&led, NODE_BREATH), "1");
}

#[test]
fn missing_sysfs_tree_reports_faults_but_succeeds() {
    let tmp = tempfile::tempdir().unwrap();
    let counter = Arc::new(FaultCounter::new());
    let mut channels = HashMap::new();
    channels.insert(CH.to_string(), vec![PathBuf::from("/nope/left")]);
    let sink = SysfsSink::new(channels).with_root(tmp.path());
    let engine =
        LightEngine::new(&BackendTable::default(), sink).with_observer(Arc::clone(&counter));

    let status = engine.set_light(LightType::Attention, LightState::new(0xFFFF_FFFF));
    assert_eq!(status, Status::Success);
    // max_brightness read + breath reset + brightness reset
    assert_eq!(counter.count(), 3);
    assert!(counter.last().unwrap().to_string().contains("notification LED"));
}
