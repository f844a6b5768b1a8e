//! Replay a synthetic meditation session and print the state stream

use synheart_mudra::features::{LEFT_EYE_BOTTOM, LEFT_EYE_TOP, NOSE_TIP};
use synheart_mudra::gesture::{INDEX_TIP, THUMB_TIP};
use synheart_mudra::posture::{LEFT_HIP, LEFT_SHOULDER, RIGHT_HIP, RIGHT_SHOULDER};
use synheart_mudra::types::{
    FaceObservation, FrameInput, HandObservation, Landmark, PoseObservation, HAND_LANDMARK_COUNT,
};
use synheart_mudra::MudraSession;

const FPS: f64 = 30.0;

fn face(eyes_closed: bool) -> FaceObservation {
    let mut landmarks = vec![Landmark::new(0.5, 0.35); 468];
    landmarks[NOSE_TIP] = Landmark::new(0.5, 0.3);
    landmarks[LEFT_EYE_TOP] = Landmark::new(0.47, 0.26);
    let gap = if eyes_closed { 0.008 } else { 0.035 };
    landmarks[LEFT_EYE_BOTTOM] = Landmark::new(0.47, 0.26 + gap);
    FaceObservation::new(landmarks)
}

fn pose() -> PoseObservation {
    let mut landmarks = vec![Landmark::new(0.5, 0.5); 33];
    landmarks[LEFT_SHOULDER] = Landmark::new(0.38, 0.45);
    landmarks[RIGHT_SHOULDER] = Landmark::new(0.62, 0.45);
    landmarks[LEFT_HIP] = Landmark::new(0.42, 0.8);
    landmarks[RIGHT_HIP] = Landmark::new(0.58, 0.8);
    PoseObservation::new(landmarks)
}

fn gyan_hand() -> HandObservation {
    let mut landmarks = vec![Landmark::new(0.3, 0.75); HAND_LANDMARK_COUNT];
    landmarks[THUMB_TIP] = Landmark::new(0.28, 0.6);
    landmarks[INDEX_TIP] = Landmark::new(0.29, 0.61);
    HandObservation::new(landmarks)
}

fn main() {
    let mut session = MudraSession::new();

    // 3 s settling in, 3 s of Gyan, then 10 s with eyes closed
    for i in 0..(16.0 * FPS) as usize {
        let t = i as f64 / FPS;
        let mut frame = FrameInput::at(t).with_pose(pose()).with_face(face(t >= 6.0));
        if (3.0..6.0).contains(&t) {
            frame = frame.with_hands(vec![gyan_hand()]);
        }

        let state = session.process_frame(&frame);
        if i % 30 == 0 {
            println!(
                "t={:>5.2}s mode={:?} progress={:.2} speed={} virtual={:.2} dominant={:?} posture={}",
                t,
                state.alignment.mode,
                state.alignment.progress,
                state.speed_multiplier,
                state.virtual_time,
                state.energy.dominant_zone(),
                state.posture.label.as_str(),
            );
        }
    }

    match serde_json::to_string_pretty(&session.summary()) {
        Ok(summary) => println!("{summary}"),
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
