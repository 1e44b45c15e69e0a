#[cfg(test)]
pub mod testing {
    use crate::frame::Frame;

    /// Build a frame out of a text mask
    ///
    /// Rows are whitespace separated, `#` is a lit pixel and anything else is
    /// dark. Missing rows and columns stay dark.
    pub trait ToFrame {
        fn to_frame(&self) -> Frame;
    }

    impl ToFrame for str {
        fn to_frame(&self) -> Frame {
            let mut frame = Frame::new();
            frame
                .iter_rows_as_bitslices_mut()
                .zip(self.split_whitespace())
                .for_each(|(f_row, c_row)| {
                    f_row
                        .iter_mut()
                        .zip(c_row.chars())
                        .for_each(|(mut f, c)| *f = c == '#')
                });
            frame
        }
    }

    mod tests {
        use super::*;

        #[test]
        fn to_frame() {
            let empty = "".to_frame();
            assert_eq!(empty, Frame::new());

            let frame = "
                #.
                .#
            "
            .to_frame();
            assert!(frame.get(0, 0));
            assert!(!frame.get(1, 0));
            assert!(!frame.get(0, 1));
            assert!(frame.get(1, 1));
        }
    }
}
