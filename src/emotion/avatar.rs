//! Emoji face synthesis.

use image::RgbImage;

use super::draw::{draw_arc, draw_line, fill_ellipse, BoundingBox};
use super::label::Emotion;
use super::palette::{FaceColors, MouthShape, WHITE};

/// Side of the square emoji canvas.
pub const AVATAR_SIZE: u32 = 300;

const FACE_RADIUS: i32 = 100;
const EYE_RADIUS: i32 = 15;
const EYE_OFFSET: i32 = 40;
const MOUTH_HALF_WIDTH: i32 = 50;
const STROKE_WIDTH: u32 = 5;

/// Draw the emoji for an arbitrary label string.
///
/// Labels outside the fixed set (including the empty string) render the
/// neutral face.
pub fn create_emotion_avatar(label: &str) -> RgbImage {
    render_avatar(Emotion::from_label(label))
}

/// Draw the emoji for `emotion` on a white 300x300 canvas.
///
/// Layout is fixed: a head disc, two round eyes and a mouth. Only the
/// colors and the mouth shape depend on the emotion.
pub fn render_avatar(emotion: Emotion) -> RgbImage {
    let colors = FaceColors::for_emotion(emotion);
    let mut avatar = RgbImage::from_pixel(AVATAR_SIZE, AVATAR_SIZE, WHITE);

    let cx = (AVATAR_SIZE / 2) as i32;
    let cy = (AVATAR_SIZE / 2) as i32;

    fill_ellipse(
        &mut avatar,
        BoundingBox::new(cx - FACE_RADIUS, cy - FACE_RADIUS, cx + FACE_RADIUS, cy + FACE_RADIUS),
        colors.background,
    );

    let eye_top = cy - EYE_OFFSET;
    let eye_bottom = eye_top + 2 * EYE_RADIUS;
    fill_ellipse(
        &mut avatar,
        BoundingBox::new(cx - EYE_OFFSET, eye_top, cx - EYE_OFFSET + 2 * EYE_RADIUS, eye_bottom),
        colors.eyes,
    );
    fill_ellipse(
        &mut avatar,
        BoundingBox::new(cx + EYE_OFFSET - 2 * EYE_RADIUS, eye_top, cx + EYE_OFFSET, eye_bottom),
        colors.eyes,
    );

    let arc_box = BoundingBox::new(cx - MOUTH_HALF_WIDTH, cy + 30, cx + MOUTH_HALF_WIDTH, cy + 80);
    match MouthShape::for_emotion(emotion) {
        MouthShape::ArcUp => {
            draw_arc(&mut avatar, arc_box, 0.0, 180.0, colors.mouth, STROKE_WIDTH);
        }
        MouthShape::ArcDown => {
            draw_arc(&mut avatar, arc_box, 180.0, 360.0, colors.mouth, STROKE_WIDTH);
        }
        MouthShape::Line => {
            draw_line(
                &mut avatar,
                (cx - MOUTH_HALF_WIDTH, cy + 50),
                (cx + MOUTH_HALF_WIDTH, cy + 50),
                colors.mouth,
                STROKE_WIDTH,
            );
        }
        MouthShape::Oval => {
            fill_ellipse(
                &mut avatar,
                BoundingBox::new(cx - MOUTH_HALF_WIDTH, cy + 40, cx + MOUTH_HALF_WIDTH, cy + 100),
                colors.mouth,
            );
        }
    }

    avatar
}
