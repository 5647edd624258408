use std::collections::HashSet;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use sessionport::protocol::{
	ClickData, Event, EventData, InputData, KeydownData, Modifiers, NavigationData, NavigationType,
	ScrollData,
};
use sessionport::{
	ElementHandle, EventReplayer, PlaybackOptions, ReplayError, ReplayTarget, TargetError,
};

#[derive(Debug)]
struct FakeHandle {
	selector: String,
}

impl ElementHandle for FakeHandle {}

/// Replay target fake: logs every primitive call and can refuse selectors
/// at resolution or action time.
#[derive(Default)]
struct FakeTarget {
	log: Mutex<Vec<String>>,
	missing: HashSet<String>,
	broken: HashSet<String>,
	locate_delay: Option<Duration>,
}

impl FakeTarget {
	fn log(&self, entry: String) {
		self.log.lock().push(entry);
	}

	fn entries(&self) -> Vec<String> {
		self.log.lock().clone()
	}

	fn check_broken(&self, selector: &str) -> Result<(), TargetError> {
		if self.broken.contains(selector) {
			return Err(TargetError::Failed {
				message: "element not interactable".into(),
			});
		}
		Ok(())
	}
}

#[async_trait]
impl ReplayTarget for FakeTarget {
	async fn locate(&self, selector: &str) -> Result<Box<dyn ElementHandle>, TargetError> {
		if let Some(delay) = self.locate_delay {
			tokio::time::sleep(delay).await;
		}
		if self.missing.contains(selector) {
			return Err(TargetError::NotFound {
				selector: selector.to_string(),
			});
		}
		Ok(Box::new(FakeHandle {
			selector: selector.to_string(),
		}))
	}

	async fn click(
		&self,
		element: &dyn ElementHandle,
		click: &ClickData,
	) -> Result<(), TargetError> {
		let handle = element.downcast_ref::<FakeHandle>().unwrap();
		self.check_broken(&handle.selector)?;
		self.log(format!("click:{}@{},{}", handle.selector, click.x, click.y));
		Ok(())
	}

	async fn set_value(&self, element: &dyn ElementHandle, value: &str) -> Result<(), TargetError> {
		let handle = element.downcast_ref::<FakeHandle>().unwrap();
		self.check_broken(&handle.selector)?;
		self.log(format!("input:{}={value}", handle.selector));
		Ok(())
	}

	async fn press_key(
		&self,
		element: Option<&dyn ElementHandle>,
		key: &KeydownData,
	) -> Result<(), TargetError> {
		let selector = element
			.and_then(|el| el.downcast_ref::<FakeHandle>())
			.map(|h| h.selector.clone())
			.unwrap_or_else(|| "<page>".into());
		self.log(format!("key:{selector}:{}", key.key));
		Ok(())
	}

	async fn navigate(&self, url: &str) -> Result<(), TargetError> {
		self.log(format!("navigate:{url}"));
		Ok(())
	}

	async fn scroll_to(&self, x: f64, y: f64) -> Result<(), TargetError> {
		self.log(format!("scroll:{x},{y}"));
		Ok(())
	}
}

fn click_event(ts: u64, selector: &str) -> Event {
	Event {
		timestamp: ts,
		target: Some(selector.into()),
		data: EventData::Click(ClickData {
			button: 0,
			x: 10.0,
			y: 20.0,
			modifiers: Modifiers::default(),
		}),
	}
}

fn input_event(ts: u64, selector: &str, value: &str) -> Event {
	Event {
		timestamp: ts,
		target: Some(selector.into()),
		data: EventData::Input(InputData {
			value: value.into(),
		}),
	}
}

fn nav_event(ts: u64, url: &str) -> Event {
	Event {
		timestamp: ts,
		target: None,
		data: EventData::Navigation(NavigationData {
			url: url.into(),
			navigation_type: NavigationType::Navigate,
		}),
	}
}

fn fast_options() -> PlaybackOptions {
	PlaybackOptions {
		speed: 100.0,
		..PlaybackOptions::default()
	}
}

#[tokio::test]
async fn dispatches_every_kind_in_given_order() {
	let target = FakeTarget::default();
	let events = vec![
		click_event(0, "button#go"),
		input_event(10, "input#q", "hello"),
		Event {
			timestamp: 20,
			target: Some("input#q".into()),
			data: EventData::Keydown(KeydownData {
				key: "Enter".into(),
				code: "Enter".into(),
				modifiers: Modifiers::default(),
			}),
		},
		nav_event(30, "https://example.com/results"),
		Event {
			timestamp: 40,
			target: None,
			data: EventData::Scroll(ScrollData { x: 0.0, y: 600.0 }),
		},
	];

	let report = EventReplayer::new()
		.play(&events, &target, &fast_options())
		.await
		.unwrap();

	assert_eq!(report.dispatched, 5);
	assert_eq!(report.skipped, 0);
	assert_eq!(
		target.entries(),
		vec![
			"click:button#go@10,20",
			"input:input#q=hello",
			"key:input#q:Enter",
			"navigate:https://example.com/results",
			"scroll:0,600",
		]
	);
}

#[tokio::test]
async fn strict_mode_halts_before_later_events() {
	let mut target = FakeTarget::default();
	target.missing.insert("input#gone".into());
	let events = vec![
		click_event(0, "button#go"),
		input_event(10, "input#gone", "x"),
		nav_event(20, "https://example.com/never"),
	];

	let err = EventReplayer::new()
		.play(&events, &target, &fast_options())
		.await
		.unwrap_err();

	match err {
		ReplayError::Resolution { selector } => assert_eq!(selector, "input#gone"),
		other => panic!("expected resolution failure, got {other}"),
	}
	// The first event ran, the third was never attempted.
	assert_eq!(target.entries(), vec!["click:button#go@10,20"]);
}

#[tokio::test]
async fn lenient_mode_skips_and_continues() {
	let mut target = FakeTarget::default();
	target.missing.insert("input#gone".into());
	let events = vec![
		click_event(0, "button#go"),
		input_event(10, "input#gone", "x"),
		nav_event(20, "https://example.com/still-runs"),
	];

	let options = PlaybackOptions {
		validate_targets: false,
		..fast_options()
	};
	let report = EventReplayer::new()
		.play(&events, &target, &options)
		.await
		.unwrap();

	assert_eq!(report.dispatched, 2);
	assert_eq!(report.skipped, 1);
	assert_eq!(
		target.entries(),
		vec![
			"click:button#go@10,20",
			"navigate:https://example.com/still-runs",
		]
	);
}

#[tokio::test]
async fn action_failure_surfaces_as_action_error() {
	let mut target = FakeTarget::default();
	target.broken.insert("button#stuck".into());
	let events = vec![click_event(0, "button#stuck")];

	let err = EventReplayer::new()
		.play(&events, &target, &fast_options())
		.await
		.unwrap_err();

	match err {
		ReplayError::Action { target, cause, .. } => {
			assert_eq!(target, "button#stuck");
			assert!(cause.contains("not interactable"));
		}
		other => panic!("expected action failure, got {other}"),
	}
}

#[tokio::test]
async fn pacing_scales_inversely_with_speed() {
	let events = vec![click_event(0, "a#x"), click_event(240, "a#y")];

	let slow_target = FakeTarget::default();
	let started = Instant::now();
	EventReplayer::new()
		.play(&events, &slow_target, &PlaybackOptions::default())
		.await
		.unwrap();
	let at_unit_speed = started.elapsed();

	let fast_target = FakeTarget::default();
	let options = PlaybackOptions {
		speed: 3.0,
		..PlaybackOptions::default()
	};
	let started = Instant::now();
	EventReplayer::new()
		.play(&events, &fast_target, &options)
		.await
		.unwrap();
	let at_triple_speed = started.elapsed();

	assert!(at_unit_speed >= Duration::from_millis(240));
	assert!(at_triple_speed >= Duration::from_millis(80));
	assert!(at_triple_speed < at_unit_speed);
}

#[tokio::test]
async fn slow_resolution_times_out() {
	let target = FakeTarget {
		locate_delay: Some(Duration::from_millis(100)),
		..FakeTarget::default()
	};
	let events = vec![click_event(0, "button#slow")];

	let options = PlaybackOptions {
		action_timeout: Duration::from_millis(20),
		..fast_options()
	};
	let err = EventReplayer::new()
		.play(&events, &target, &options)
		.await
		.unwrap_err();

	match err {
		ReplayError::Action { cause, .. } => assert!(cause.contains("timed out")),
		other => panic!("expected timeout, got {other}"),
	}
}

#[tokio::test]
async fn zero_speed_is_rejected() {
	let target = FakeTarget::default();
	let options = PlaybackOptions {
		speed: 0.0,
		..PlaybackOptions::default()
	};
	let err = EventReplayer::new()
		.play(&[click_event(0, "a#x")], &target, &options)
		.await
		.unwrap_err();
	assert!(matches!(err, ReplayError::InvalidSpeed(_)));
}

#[tokio::test]
async fn click_without_target_is_rejected() {
	let target = FakeTarget::default();
	let events = vec![Event {
		timestamp: 0,
		target: None,
		data: EventData::Click(ClickData {
			button: 0,
			x: 1.0,
			y: 1.0,
			modifiers: Modifiers::default(),
		}),
	}];

	let err = EventReplayer::new()
		.play(&events, &target, &fast_options())
		.await
		.unwrap_err();
	assert!(matches!(err, ReplayError::MissingTarget { .. }));
}
