use crate::{
    error::{ErrorKind, ScnError},
    graphics::StrokePos,
    stroke::Stroke,
};

// leftover arc length shorter than this doesn't get the final sample appended
const EPSILON: f64 = 1e-4;

/// Upper bound on the samples [resample] produces for one stroke. Strokes too long for this at
/// the requested interval are resampled at `length / MAX_SAMPLES` instead.
pub const MAX_SAMPLES: usize = 1 << 16;

/// Picks the point of a finished stroke that gets reported.
///
/// The stroke is resampled every `interval` units of arc length, and the rightmost resampled
/// point wins. On ties the earlier point is kept.
pub fn extract(stroke: &Stroke, interval: f32) -> Result<StrokePos, ScnError> {
    let positions = stroke.positions().collect::<Vec<_>>();
    select(&resample(&positions, interval))
}

/// Walks the polyline through `points`, emitting its start, a point every `interval` units along
/// it, and its end. Samples with a non-finite coordinate are dropped first.
pub fn resample(points: &[StrokePos], interval: f32) -> Vec<StrokePos> {
    let points = points
        .iter()
        .copied()
        .filter(|point| point.is_finite())
        .collect::<Vec<_>>();

    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };

    if !(interval.is_finite() && interval > 0.) {
        return points;
    }

    let length = points
        .windows(2)
        .map(|pair| pair[0].distance(pair[1]))
        .sum::<f64>();
    let interval = f64::from(interval).max(length / MAX_SAMPLES as f64);

    let mut resampled = vec![first];
    let mut prev = first;
    // arc length since the last emitted point
    let mut carried = 0.;

    for &next in rest {
        let segment = prev.distance(next);
        if segment == 0. {
            continue;
        }

        let offset = interval - carried;
        if offset <= segment {
            let steps = ((segment - offset) / interval).floor() as u64;
            for step in 0..=steps {
                let along = offset + step as f64 * interval;
                resampled.push(prev.lerp(next, along / segment));
            }
            carried = segment - (offset + steps as f64 * interval);
        } else {
            carried += segment;
        }

        prev = next;
    }

    if carried > EPSILON {
        resampled.push(prev);
    }

    resampled
}

pub fn select(points: &[StrokePos]) -> Result<StrokePos, ScnError> {
    let (&first, rest) = points
        .split_first()
        .ok_or_else(|| ScnError::new(ErrorKind::EmptyStroke))?;

    // height never breaks a tie, only strictly rightward progress replaces the candidate
    Ok(rest.iter().fold(first, |candidate, &point| {
        if point.x > candidate.x {
            point
        } else {
            candidate
        }
    }))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        graphics::{Color, ColorExt},
        stroke::StrokeElement,
    };

    fn pos(x: f32, y: f32) -> StrokePos {
        StrokePos::new(x, y)
    }

    fn assert_near(got: &[StrokePos], want: &[StrokePos]) {
        assert_eq!(got.len(), want.len(), "{got:?} vs {want:?}");
        for (got, want) in got.iter().zip(want) {
            assert!(got.distance(*want) < 1e-4, "{got} vs {want}");
        }
    }

    fn stroke(points: &[(f32, f32)]) -> Stroke {
        Stroke::with_points(
            points
                .iter()
                .map(|&(x, y)| StrokeElement::at(x, y))
                .collect(),
            Color::BLACK,
        )
    }

    #[test]
    fn ties_keep_the_earlier_point() {
        let points = [pos(0., 0.), pos(5., 10.), pos(5., 2.), pos(3., 0.)];
        assert_eq!(select(&points).unwrap(), pos(5., 10.));
    }

    #[test]
    fn rightward_progress_wins_regardless_of_height() {
        let points = [pos(0., 0.), pos(1., -5.), pos(2., 50.)];
        assert_eq!(select(&points).unwrap(), pos(2., 50.));
    }

    #[test]
    fn nothing_to_select() {
        assert!(matches!(
            select(&[]).unwrap_err().kind(),
            ErrorKind::EmptyStroke
        ));
        assert!(matches!(
            extract(&Stroke::default(), crate::RESAMPLE_INTERVAL)
                .unwrap_err()
                .kind(),
            ErrorKind::EmptyStroke
        ));
    }

    #[test]
    fn single_point_stroke() {
        let stroke = stroke(&[(3.5, -7.25)]);
        assert_eq!(
            extract(&stroke, crate::RESAMPLE_INTERVAL).unwrap(),
            pos(3.5, -7.25)
        );
    }

    #[test]
    fn resample_straight_line() {
        let resampled = resample(&[pos(0., 0.), pos(12., 0.)], 5.);
        assert_near(
            &resampled,
            &[pos(0., 0.), pos(5., 0.), pos(10., 0.), pos(12., 0.)],
        );
    }

    #[test]
    fn resample_carries_across_segments() {
        let resampled = resample(&[pos(0., 0.), pos(3., 0.), pos(3., 4.)], 5.);
        assert_near(&resampled, &[pos(0., 0.), pos(3., 2.), pos(3., 4.)]);
    }

    #[test]
    fn resample_ends_on_an_interval() {
        let resampled = resample(&[pos(0., 0.), pos(0., 10.)], 5.);
        assert_near(&resampled, &[pos(0., 0.), pos(0., 5.), pos(0., 10.)]);
    }

    #[test]
    fn resample_skips_repeated_samples() {
        let resampled = resample(&[pos(1., 1.), pos(1., 1.), pos(1., 1.)], 5.);
        assert_eq!(resampled, vec![pos(1., 1.)]);
    }

    #[test]
    fn bad_interval_uses_raw_samples() {
        let points = [pos(0., 0.), pos(1., 1.)];
        assert_eq!(resample(&points, 0.), points.to_vec());
        assert_eq!(resample(&points, f32::NAN), points.to_vec());
    }

    #[test]
    fn very_long_strokes_are_capped() {
        let resampled = resample(&[pos(0., 0.), pos(2e8, 0.)], 5.);
        assert!(resampled.len() <= MAX_SAMPLES + 2, "{}", resampled.len());
        assert_eq!(resampled.first(), Some(&pos(0., 0.)));
        assert_eq!(resampled.last(), Some(&pos(2e8, 0.)));
        assert!(resampled.windows(2).all(|pair| pair[0].x < pair[1].x));
    }

    #[test]
    fn non_finite_samples_are_dropped() {
        let resampled = resample(
            &[pos(0., 0.), pos(f32::INFINITY, 0.), pos(10., f32::NAN), pos(10., 0.)],
            5.,
        );
        assert_near(&resampled, &[pos(0., 0.), pos(5., 0.), pos(10., 0.)]);

        let stroke = stroke(&[(f32::INFINITY, 0.), (f32::NEG_INFINITY, 1.)]);
        assert!(matches!(
            extract(&stroke, crate::RESAMPLE_INTERVAL).unwrap_err().kind(),
            ErrorKind::EmptyStroke
        ));
    }

    #[test]
    fn extract_keeps_first_of_rightmost() {
        let stroke = stroke(&[(0., 0.), (20., 0.), (20., 10.), (4., 10.)]);
        let point = extract(&stroke, crate::RESAMPLE_INTERVAL).unwrap();
        assert_near(&[point], &[pos(20., 0.)]);
    }

    #[test]
    fn extract_between_raw_samples() {
        // resampling never reaches the corner at x=7, only 5 units along
        let stroke = stroke(&[(0., 0.), (7., 0.), (7., -0.5), (0., -0.5)]);
        let point = extract(&stroke, crate::RESAMPLE_INTERVAL).unwrap();
        assert_near(&[point], &[pos(5., 0.)]);
    }
}
