use fluentkit_services::icon::{IconEvent, IconManager, IconSize};
use fluentkit_services::settings::IconSettings;
use tokio::sync::broadcast::error::TryRecvError;

fn manager() -> IconManager {
    IconManager::new(IconSettings {
        load_builtin: false,
        ..Default::default()
    })
}

#[tokio::test]
async fn test_register_and_unregister_events() {
    let manager = manager();
    let mut events = manager.subscribe();

    manager.register_resource_icon("home", "solid/house", "solid").unwrap();
    manager.unregister_icon("home");

    assert_eq!(
        events.recv().await.unwrap(),
        IconEvent::Registered { name: "home".to_string() }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        IconEvent::Unregistered { name: "home".to_string() }
    );
}

#[tokio::test]
async fn test_failed_operations_emit_nothing() {
    let manager = manager();
    let mut events = manager.subscribe();

    assert!(manager.register_icon("ghost", "/definitely/not/here.svg", "").is_err());
    assert!(!manager.unregister_icon("ghost"));
    assert!(manager.get_icon("ghost", IconSize::square(16), None).is_err());

    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_cache_cleared_events() {
    let manager = manager();
    manager.register_resource_icon("heart", "solid/heart", "").unwrap();
    let mut events = manager.subscribe();

    manager.clear_icon_cache("heart");
    manager.clear_cache();

    assert_eq!(
        events.recv().await.unwrap(),
        IconEvent::CacheCleared { icon: Some("heart".to_string()) }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        IconEvent::CacheCleared { icon: None }
    );
}

#[test]
fn test_events_without_subscribers() {
    let manager = manager();
    manager.register_resource_icon("heart", "solid/heart", "").unwrap();
    manager.clear_cache();
    assert!(manager.has_icon("heart"));
}
