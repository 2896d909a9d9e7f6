/// produces: [ linear_interpol(start, end, i/(n-1)) | i <- 0..n ]
/// (includes both "start" and "end"; n == 1 gives only "start")
///
/// linear_interpol(a, b, p) = (1 - p) * a + p * b
#[derive(Clone, Debug)]
pub struct Linspace {
    current: u64,
    current_back: u64,
    n: u64,
    start: f64,
    end: f64,
}

impl Linspace {
    pub fn new(start: f64, end: f64, n: u64) -> Self {
        Linspace {
            current: 0,
            current_back: n,
            n,
            start,
            end,
        }
    }

    fn length(&self) -> u64 {
        self.current_back - self.current
    }

    fn at(&self, pos: u64) -> f64 {
        if self.n < 2 {
            return self.start;
        }
        let f_pos = pos as f64 / (self.n - 1) as f64;
        (1. - f_pos) * self.start + f_pos * self.end
    }

    fn usize_len(&self) -> usize {
        let l = self.length();
        debug_assert!(l <= ::std::usize::MAX as u64);
        l as usize
    }
}

impl Iterator for Linspace {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.current_back {
            return None;
        }
        let result = self.at(self.current);
        self.current += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let l = self.usize_len();
        (l, Some(l))
    }

    fn count(self) -> usize {
        self.usize_len()
    }
}

impl DoubleEndedIterator for Linspace {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.current >= self.current_back {
            return None;
        }
        self.current_back -= 1;
        let result = self.at(self.current_back);
        Some(result)
    }
}

impl ExactSizeIterator for Linspace {
    fn len(&self) -> usize {
        self.usize_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_both_ends() {
        let v: Vec<f64> = Linspace::new(0., 1., 5).collect();
        assert_eq!(v, vec![0., 0.25, 0.5, 0.75, 1.]);
    }

    #[test]
    fn single_point_is_start() {
        let v: Vec<f64> = Linspace::new(0.3, 1., 1).collect();
        assert_eq!(v, vec![0.3]);
        assert_eq!(Linspace::new(0., 1., 0).count(), 0);
    }

    #[test]
    fn reverse_and_len() {
        let mut it = Linspace::new(0., 1., 3);
        assert_eq!(it.len(), 3);
        assert_eq!(it.next_back(), Some(1.));
        assert_eq!(it.next(), Some(0.));
        assert_eq!(it.len(), 1);
        assert_eq!(it.next(), Some(0.5));
        assert_eq!(it.next(), None);
    }
}
