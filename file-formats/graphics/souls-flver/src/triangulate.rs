//! Conversion of triangle strips into triangle lists

/// Strip index that ends the current strip and starts a new one
pub const PRIMITIVE_RESTART: u32 = 0xFFFF;

/// Expand a triangle strip into a list of triangles.
///
/// Every window of three consecutive indices forms a triangle; every other one
/// is emitted reversed to keep the winding consistent. With
/// `allow_primitive_restarts`, windows touching [`PRIMITIVE_RESTART`] emit
/// nothing and restart the winding. Triangles with repeated indices are dropped
/// unless `include_degenerate_faces` is set.
pub fn strip_to_list(
    indices: &[u32],
    allow_primitive_restarts: bool,
    include_degenerate_faces: bool,
) -> Vec<u32> {
    let mut triangles = Vec::with_capacity(indices.len().saturating_sub(2) * 3);
    let mut flip = false;

    for window in indices.windows(3) {
        let [a, b, c] = [window[0], window[1], window[2]];
        if allow_primitive_restarts && window.contains(&PRIMITIVE_RESTART) {
            flip = false;
            continue;
        }

        if include_degenerate_faces || (a != b && b != c && c != a) {
            if flip {
                triangles.extend_from_slice(&[c, b, a]);
            } else {
                triangles.extend_from_slice(&[a, b, c]);
            }
        }
        flip = !flip;
    }

    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_alternating_winding() {
        assert_eq!(
            strip_to_list(&[0, 1, 2, 3, 4], false, false),
            vec![0, 1, 2, 3, 2, 1, 2, 3, 4]
        );
    }

    #[test]
    fn test_restart_resets_winding() {
        let strip = [0, 1, 2, 3, PRIMITIVE_RESTART, 4, 5, 6];
        assert_eq!(
            strip_to_list(&strip, true, false),
            vec![0, 1, 2, 3, 2, 1, 4, 5, 6]
        );
    }

    #[test]
    fn test_restart_as_plain_index() {
        let strip = [0, 1, PRIMITIVE_RESTART];
        assert_eq!(strip_to_list(&strip, false, false), vec![0, 1, PRIMITIVE_RESTART]);
    }

    #[test]
    fn test_degenerate_windows_still_flip() {
        // both degenerate windows still toggle the winding
        let strip = [0, 1, 1, 2, 3];
        assert_eq!(strip_to_list(&strip, false, false), vec![1, 2, 3]);
        assert_eq!(
            strip_to_list(&strip, false, true),
            vec![0, 1, 1, 2, 1, 1, 1, 2, 3]
        );
    }

    #[test]
    fn test_short_strips() {
        assert!(strip_to_list(&[], true, false).is_empty());
        assert!(strip_to_list(&[0, 1], true, false).is_empty());
    }

    proptest! {
        #[test]
        fn distinct_strip_yields_every_window(len in 3usize..200) {
            let strip: Vec<u32> = (0..len as u32).collect();
            let triangles = strip_to_list(&strip, true, false);
            prop_assert_eq!(triangles.len(), 3 * (len - 2));
            for (i, triangle) in triangles.chunks(3).enumerate() {
                let i = i as u32;
                if i % 2 == 0 {
                    prop_assert_eq!(triangle, &[i, i + 1, i + 2]);
                } else {
                    prop_assert_eq!(triangle, &[i + 2, i + 1, i]);
                }
            }
        }

        #[test]
        fn output_is_whole_triangles(strip in proptest::collection::vec(0u32..8, 0..64)) {
            let triangles = strip_to_list(&strip, true, false);
            prop_assert_eq!(triangles.len() % 3, 0);
            prop_assert!(triangles.len() <= 3 * strip.len().saturating_sub(2));
        }
    }
}
