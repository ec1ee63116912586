mod common;

use std::{os::unix::net::UnixStream, thread};

use common::{FakeCompositor, Script};
use wlwindow::{
    Error,
    connection::{Connection, Listener},
    protocol::{
        display, output, registry,
        types::Argument,
    },
    transport::Transport,
};

/// Scale factors seen by output listeners.
type Seen = Vec<i32>;

fn pair() -> (Connection<Seen>, FakeCompositor) {
    let (client, server) = UnixStream::pair().unwrap();
    (
        Connection::new(Transport::from_stream(client)),
        FakeCompositor::new(server, Script::default()),
    )
}

/// Creates a registry and binds an output on it, as the fake sees them.
fn bind_output(conn: &mut Connection<Seen>, fake: &mut FakeCompositor) -> u32 {
    let registry = display::get_registry(conn).unwrap();
    let id = registry::bind(conn, registry, common::OUTPUT_NAME, &output::INTERFACE, 4).unwrap();
    assert!(fake.next_request().unwrap().is("wl_display", "get_registry"));
    assert!(fake.next_request().unwrap().is("wl_registry", "bind"));
    id
}

fn scale_listener() -> Listener<Seen> {
    Listener::output(|_, seen: &mut Seen, _, event| {
        if let output::Event::Scale { factor } = event {
            seen.push(factor);
        }
        Ok(())
    })
}

#[test]
fn events_reach_the_installed_listener_in_order() {
    let (mut conn, mut fake) = pair();
    let id = bind_output(&mut conn, &mut fake);
    conn.set_listener(id, scale_listener(), None).unwrap();

    let mut seen = Seen::new();
    // Drain what the fake sent in response to get_registry and bind.
    conn.dispatch_pending(&mut seen).unwrap();
    seen.clear();

    fake.send(id, 3, vec![Argument::Int(2)]).unwrap();
    fake.send(id, 3, vec![Argument::Int(3)]).unwrap();
    assert_eq!(conn.dispatch_pending(&mut seen).unwrap(), 2);
    assert_eq!(seen, vec![2, 3]);
}

#[test]
fn listener_sees_its_user_data() {
    let (mut conn, mut fake) = pair();
    let id = bind_output(&mut conn, &mut fake);
    let listener = Listener::output(|_, seen: &mut Seen, ctx, event| {
        if let output::Event::Done = event {
            seen.push(*ctx.user_data::<i32>().unwrap());
        }
        Ok(())
    });
    conn.set_listener(id, listener, Some(Box::new(42i32))).unwrap();

    let mut seen = Seen::new();
    conn.dispatch_pending(&mut seen).unwrap();
    assert_eq!(seen, vec![42]);
    assert_eq!(conn.objects().user_data::<i32>(id), Some(&42));
}

#[test]
fn events_without_a_listener_are_dropped() {
    let (mut conn, mut fake) = pair();
    let id = bind_output(&mut conn, &mut fake);

    fake.send(id, 3, vec![Argument::Int(2)]).unwrap();
    let mut seen = Seen::new();
    assert!(conn.dispatch_pending(&mut seen).unwrap() > 0);
    assert!(seen.is_empty());
    assert!(conn.is_usable());
}

#[test]
fn requests_on_destroyed_proxies_are_rejected() {
    let (mut conn, mut fake) = pair();
    let id = bind_output(&mut conn, &mut fake);
    conn.set_listener(id, scale_listener(), None).unwrap();

    conn.destroy(id).unwrap();
    assert!(fake.next_request().unwrap().is("wl_output", "release"));

    let err = conn.send_request(id, &output::INTERFACE, 0, vec![]).unwrap_err();
    assert!(matches!(err, Error::UseAfterDestroy(found) if found == id));
    assert!(matches!(conn.destroy(id), Err(Error::UseAfterDestroy(_))));

    // In-flight events for the old id are dropped, not dispatched.
    let mut seen = Seen::new();
    fake.send_as(id, &output::INTERFACE, 3, vec![Argument::Int(5)]).unwrap();
    conn.dispatch_pending(&mut seen).unwrap();
    assert!(!seen.contains(&5));
    assert!(conn.is_usable());
}

#[test]
fn requests_may_not_reference_dead_objects() {
    let (mut conn, mut fake) = pair();
    let registry = display::get_registry(&mut conn).unwrap();
    fake.next_request().unwrap();

    let err = registry::bind(&mut conn, 99, 1, &output::INTERFACE, 4).unwrap_err();
    assert!(matches!(err, Error::UnknownObject(99)));

    let err = conn
        .send_request(registry, &output::INTERFACE, 0, vec![])
        .unwrap_err();
    assert!(matches!(err, Error::InterfaceMismatch { expected: "wl_output", actual: "wl_registry", .. }));
}

#[test]
fn listener_kind_must_match_the_proxy() {
    let (mut conn, mut fake) = pair();
    let id = bind_output(&mut conn, &mut fake);

    let err = conn
        .set_listener(id, Listener::registry(|_, _, _, _| Ok(())), None)
        .unwrap_err();
    assert!(matches!(err, Error::InterfaceMismatch { .. }));
}

#[test]
fn unknown_event_opcode_fails_the_connection() {
    let (mut conn, mut fake) = pair();
    let registry = display::get_registry(&mut conn).unwrap();
    fake.next_request().unwrap();
    conn.dispatch_pending(&mut Seen::new()).unwrap();

    let message: Vec<u8> = wlwindow::protocol::message::WlMessage::new(registry, 7, vec![])
        .unwrap()
        .into();
    fake.transport.send(&message, &[]).unwrap();

    let err = conn.dispatch_pending(&mut Seen::new()).unwrap_err();
    assert!(matches!(err, Error::UnknownOpcode { interface: "wl_registry", opcode: 7, .. }));
    assert!(!conn.is_usable());
    assert!(matches!(conn.dispatch_pending(&mut Seen::new()), Err(Error::NotConnected)));
}

#[test]
fn truncated_event_is_a_codec_error() {
    let (mut conn, mut fake) = pair();
    let id = bind_output(&mut conn, &mut fake);
    conn.set_listener(id, scale_listener(), None).unwrap();
    let mut seen = Seen::new();
    conn.dispatch_pending(&mut seen).unwrap();
    seen.clear();

    // scale takes one int; send none.
    let message: Vec<u8> = wlwindow::protocol::message::WlMessage::new(id, 3, vec![])
        .unwrap()
        .into();
    fake.transport.send(&message, &[]).unwrap();

    let err = conn.dispatch_pending(&mut seen).unwrap_err();
    assert!(matches!(err, Error::Codec(_)));
    assert!(seen.is_empty());
}

#[test]
fn roundtrip_waits_for_the_callback() {
    let (client, server) = UnixStream::pair().unwrap();
    let mut conn: Connection<Seen> = Connection::new(Transport::from_stream(client));

    let server = thread::spawn(move || {
        let mut fake = FakeCompositor::new(server, Script::default());
        let sync = fake.next_request().unwrap();
        assert!(sync.is("wl_display", "sync"));
        fake
    });

    conn.roundtrip(&mut Seen::new()).unwrap();
    server.join().unwrap();

    // The callback retired itself; only the display is left.
    assert_eq!(conn.objects().len(), 1);
    assert!(conn.is_usable());
}
