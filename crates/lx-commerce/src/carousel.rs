/// Index bookkeeping for the testimonial slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    current: usize,
}

impl Carousel {
    /// `None` when there are no slides.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { len, current: 0 })
    }

    pub fn next(&mut self) -> usize {
        self.current = (self.current + 1) % self.len;
        self.current
    }

    pub fn prev(&mut self) -> usize {
        self.current = (self.current + self.len - 1) % self.len;
        self.current
    }

    pub fn auto_advances(&self) -> bool {
        self.len > 1
    }
}
