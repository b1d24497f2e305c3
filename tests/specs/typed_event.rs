//! End-to-end behavior of a single `TypedEvent` channel.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tev_core::TypedEvent;

#[tokio::test]
async fn emit_async_interleaves_starts_and_completions() {
    let event = TypedEvent::new();
    let trace: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let t1 = Arc::clone(&trace);
    event.on_async(move |value: u32| {
        let trace = Arc::clone(&t1);
        async move {
            trace.lock().unwrap().push("handler1-start".to_string());
            tokio::time::sleep(Duration::from_millis(50)).await;
            trace.lock().unwrap().push(format!("handler1-end-{value}"));
            Ok(())
        }
    });
    let t2 = Arc::clone(&trace);
    event.on_async(move |value: u32| {
        let trace = Arc::clone(&t2);
        async move {
            trace.lock().unwrap().push("handler2-start".to_string());
            tokio::time::sleep(Duration::from_millis(30)).await;
            trace.lock().unwrap().push(format!("handler2-end-{value}"));
            Ok(())
        }
    });

    trace.lock().unwrap().push("before-emit".to_string());
    event.emit_async(100).await.unwrap();
    trace.lock().unwrap().push("after-emit".to_string());

    assert_eq!(
        *trace.lock().unwrap(),
        vec![
            "before-emit",
            "handler1-start",
            "handler2-start",
            "handler2-end-100",
            "handler1-end-100",
            "after-emit",
        ]
    );
}

#[tokio::test]
async fn once_counts_emit_and_emit_async_as_emissions() {
    let event = TypedEvent::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let s = Arc::clone(&seen);
    event.once(move |value: u32| {
        s.lock().unwrap().push(value);
        Ok(())
    });

    event.emit(1).unwrap();
    event.emit_async(2).await.unwrap();
    event.emit(3).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![1]);
}

#[test]
fn a_channel_with_no_subscribers_accepts_emissions() {
    let event: TypedEvent<String> = TypedEvent::new();
    event.emit("nobody listening".to_string()).unwrap();
    assert_eq!(event.handler_count(), 0);
}

#[tokio::test]
async fn emit_async_handles_a_mix_of_sync_and_async_handlers() {
    let event = TypedEvent::new();
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let s1 = Arc::clone(&seen);
    event.on(move |value: u32| {
        s1.lock().unwrap().push(format!("sync-{value}"));
        Ok(())
    });
    let s2 = Arc::clone(&seen);
    event.on_async(move |value: u32| {
        let seen = Arc::clone(&s2);
        async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            seen.lock().unwrap().push(format!("async-{value}"));
            Ok(())
        }
    });
    let s3 = Arc::clone(&seen);
    event.on(move |value: u32| {
        s3.lock().unwrap().push(format!("sync2-{value}"));
        Ok(())
    });

    event.emit_async(7).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen.contains(&"sync-7".to_string()));
    assert!(seen.contains(&"async-7".to_string()));
    assert!(seen.contains(&"sync2-7".to_string()));
}
