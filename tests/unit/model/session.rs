use super::*;
use crate::model::sample_set;

fn png(tag: u8) -> MediaBlob {
    MediaBlob::new("image/png", vec![tag; 4])
}

#[test]
fn latest_ticket_wins_regardless_of_completion_order() {
    let mut ws = Workspace::new("theme", "");
    ws.set_result(sample_set());

    let first = ws.begin_media(MediaKind::Image, QuadrantId::B);
    let second = ws.begin_media(MediaKind::Image, QuadrantId::B);

    assert!(ws.complete_media(second, png(2)));
    assert!(!ws.complete_media(first, png(1)));

    let b = ws.result().unwrap().scenario(QuadrantId::B).unwrap();
    assert_eq!(b.image.as_ref().unwrap().bytes(), &[2, 2, 2, 2]);
}

#[test]
fn slots_are_independent() {
    let mut ws = Workspace::new("theme", "");
    ws.set_result(sample_set());

    let img_a = ws.begin_media(MediaKind::Image, QuadrantId::A);
    let img_d = ws.begin_media(MediaKind::Image, QuadrantId::D);
    let audio_a = ws.begin_media(MediaKind::Audio, QuadrantId::A);

    assert!(ws.complete_media(img_d, png(4)));
    assert!(ws.complete_media(img_a, png(1)));
    assert!(ws.complete_media(audio_a, MediaBlob::new("audio/wav", vec![0; 44])));

    let set = ws.result().unwrap();
    assert!(set.scenario(QuadrantId::A).unwrap().audio.is_some());
    assert!(set.scenario(QuadrantId::C).unwrap().image.is_none());
}

#[test]
fn clearing_invalidates_outstanding_tickets() {
    let mut ws = Workspace::new("theme", "");
    ws.set_result(sample_set());
    let ticket = ws.begin_media(MediaKind::Audio, QuadrantId::C);

    ws.clear();
    assert!(ws.result().is_none());
    ws.set_result(sample_set());

    assert!(!ws.is_current(&ticket));
    assert!(!ws.complete_media(ticket, MediaBlob::new("audio/wav", vec![0; 44])));
    assert!(
        ws.result()
            .unwrap()
            .scenario(QuadrantId::C)
            .unwrap()
            .audio
            .is_none()
    );
}

#[test]
fn completing_without_result_is_rejected() {
    let mut ws = Workspace::default();
    let ticket = ws.begin_media(MediaKind::Image, QuadrantId::A);
    assert!(!ws.complete_media(ticket, png(9)));
}
