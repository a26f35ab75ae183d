// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's screen memory
//!
//! The screen is a grid of booleans. Conversion into presentable pixels
//! only happens at the edge, in [Screen::to_words] and [Screen::render].

use std::fmt::{Display, Formatter};

/// Width of the screen, in pixels
pub const WIDTH: usize = 64;
/// Height of the screen, in pixels
pub const HEIGHT: usize = 32;

/// A 64x32 monochrome framebuffer
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Screen {
    pixels: [[bool; WIDTH]; HEIGHT],
}

impl Screen {
    /// Constructs a new, blank [Screen]
    pub fn new() -> Self {
        Screen {
            pixels: [[false; WIDTH]; HEIGHT],
        }
    }

    /// Turns every pixel off
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// let mut screen = Screen::new();
    /// screen.toggle(3, 4);
    /// screen.clear();
    /// assert!(screen.is_blank());
    /// ```
    pub fn clear(&mut self) {
        self.pixels = [[false; WIDTH]; HEIGHT];
    }

    /// Gets the pixel at (x, y), or [None] if it's off the screen
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        self.pixels.get(y)?.get(x).copied()
    }

    /// XORs a lit pixel into (x, y), reporting whether a lit pixel was turned off.
    ///
    /// Coordinates off the screen are ignored.
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// let mut screen = Screen::new();
    /// assert!(!screen.toggle(10, 10));
    /// assert_eq!(Some(true), screen.get(10, 10));
    /// // toggling it again turns it off: a collision
    /// assert!(screen.toggle(10, 10));
    /// assert_eq!(Some(false), screen.get(10, 10));
    /// // off-screen pixels don't exist
    /// assert!(!screen.toggle(WIDTH, 0));
    /// ```
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        match self.pixels.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(pixel) => {
                let collision = *pixel;
                *pixel = !*pixel;
                collision
            }
            None => false,
        }
    }

    /// Returns true if no pixel is lit
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().flatten().all(|&pixel| !pixel)
    }

    /// Iterates over the rows of the screen, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool; WIDTH]> {
        self.pixels.iter()
    }

    /// Converts the screen into one word per pixel, `0xffffffff` when lit and `0` when not
    /// # Examples
    /// ```rust
    /// # use cosmac::*;
    /// let mut screen = Screen::new();
    /// screen.toggle(1, 0);
    /// let words = screen.to_words();
    /// assert_eq!(WIDTH * HEIGHT, words.len());
    /// assert_eq!(&[0, 0xffffffff, 0], &words[0..3]);
    /// ```
    pub fn to_words(&self) -> Vec<u32> {
        let mut words = vec![0; WIDTH * HEIGHT];
        self.render(&mut words, u32::MAX, 0);
        words
    }

    /// Renders the screen into a row-major buffer of `WIDTH * HEIGHT` words,
    /// using `fg` for lit pixels and `bg` for unlit ones.
    ///
    /// If the buffer is short, only the pixels that fit are rendered.
    pub fn render(&self, buffer: &mut [u32], fg: u32, bg: u32) {
        for (word, &pixel) in buffer.iter_mut().zip(self.pixels.iter().flatten()) {
            *word = if pixel { fg } else { bg };
        }
    }

    /// Prints the screen to stdout
    ///
    /// Draws with braille characters when the `drawille` feature is enabled
    pub fn print_screen(&self) {
        #[cfg(feature = "drawille")]
        {
            use drawille::Canvas;
            let mut canvas = Canvas::new(WIDTH as u32, HEIGHT as u32);
            for (y, row) in self.rows().enumerate() {
                for (x, _) in row.iter().enumerate().filter(|&(_, &pixel)| pixel) {
                    canvas.set(x as u32, y as u32);
                }
            }
            println!("{}", canvas.frame());
        }
        #[cfg(not(feature = "drawille"))]
        print!("{self}");
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws the screen with box characters, one line per row
impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (y, row) in self.rows().enumerate() {
            write!(f, "{y:02x}|")?;
            for &pixel in row {
                write!(f, "{}", if pixel { '█' } else { ' ' })?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}
