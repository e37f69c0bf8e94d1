//! Version comparison utilities

use std::cmp::Ordering;

/// Compare two version (or release) strings segment by segment.
///
/// Strings are split into alternating numeric and alphabetic segments;
/// everything else is a separator. Numeric segments compare numerically and
/// are newer than alphabetic ones. A `~` sorts before anything, including the
/// end of the string, so `1.0~rc1 < 1.0`.
pub fn vercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let one = a.as_bytes();
    let two = b.as_bytes();
    let (mut i, mut j) = (0usize, 0usize);

    loop {
        while i < one.len() && !one[i].is_ascii_alphanumeric() && one[i] != b'~' {
            i += 1;
        }
        while j < two.len() && !two[j].is_ascii_alphanumeric() && two[j] != b'~' {
            j += 1;
        }

        let tilde_one = one.get(i) == Some(&b'~');
        let tilde_two = two.get(j) == Some(&b'~');
        if tilde_one || tilde_two {
            if !tilde_one {
                return Ordering::Greater;
            }
            if !tilde_two {
                return Ordering::Less;
            }
            i += 1;
            j += 1;
            continue;
        }

        if i >= one.len() || j >= two.len() {
            break;
        }

        let numeric = one[i].is_ascii_digit();
        let take = |s: &[u8], mut k: usize| {
            let start = k;
            while k < s.len()
                && (if numeric { s[k].is_ascii_digit() } else { s[k].is_ascii_alphabetic() })
            {
                k += 1;
            }
            (start, k)
        };

        let (s1, e1) = take(one, i);
        let (s2, e2) = take(two, j);
        i = e1;
        j = e2;

        if s2 == e2 {
            // segment types differ: numeric is newer than alpha
            return if numeric { Ordering::Greater } else { Ordering::Less };
        }

        let seg1 = &a[s1..e1];
        let seg2 = &b[s2..e2];
        let ord = if numeric {
            let n1 = seg1.trim_start_matches('0');
            let n2 = seg2.trim_start_matches('0');
            n1.len().cmp(&n2.len()).then_with(|| n1.cmp(n2))
        } else {
            seg1.cmp(seg2)
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    match (i >= one.len(), j >= two.len()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        _ => Ordering::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vercmp_numeric() {
        assert_eq!(vercmp("1.0", "1.0"), Ordering::Equal);
        assert_eq!(vercmp("1.10", "1.9"), Ordering::Greater);
        assert_eq!(vercmp("1.0.1", "1.0"), Ordering::Greater);
        assert_eq!(vercmp("2.0", "10.0"), Ordering::Less);
        assert_eq!(vercmp("1.001", "1.1"), Ordering::Equal);
    }

    #[test]
    fn test_vercmp_alpha() {
        assert_eq!(vercmp("1.0a", "1.0b"), Ordering::Less);
        assert_eq!(vercmp("1.0", "1.a"), Ordering::Greater);
        assert_eq!(vercmp("a", "b"), Ordering::Less);
    }

    #[test]
    fn test_vercmp_separators() {
        assert_eq!(vercmp("1_0", "1.0"), Ordering::Equal);
        assert_eq!(vercmp("1..0", "1.0"), Ordering::Equal);
    }

    #[test]
    fn test_vercmp_tilde() {
        assert_eq!(vercmp("1.0~rc1", "1.0"), Ordering::Less);
        assert_eq!(vercmp("1.0~rc1", "1.0~rc2"), Ordering::Less);
        assert_eq!(vercmp("1.0", "1.0~beta"), Ordering::Greater);
    }
}
