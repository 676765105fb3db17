use neuromorphic_event_types::SpikeEvent;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Valid,
}

impl Filter {
    fn accepts(self, event: &SpikeEvent) -> bool {
        match self {
            Filter::All => true,
            Filter::Valid => event.is_valid(),
        }
    }
}

macro_rules! iterator {
    ($name:ident, $slice_iter:ident, $reference:ty) => {
        /// Yields `(index, event)` pairs over the written events of a packet.
        #[derive(Debug)]
        pub struct $name<'a> {
            inner: std::iter::Enumerate<std::slice::$slice_iter<'a, SpikeEvent>>,
            direction: Direction,
            filter: Filter,
        }

        impl<'a> $name<'a> {
            pub(crate) fn new(
                inner: std::iter::Enumerate<std::slice::$slice_iter<'a, SpikeEvent>>,
                direction: Direction,
                filter: Filter,
            ) -> Self {
                Self {
                    inner,
                    direction,
                    filter,
                }
            }
        }

        impl<'a> Iterator for $name<'a> {
            type Item = (i32, $reference);

            fn next(&mut self) -> Option<Self::Item> {
                let filter = self.filter;
                let found = match self.direction {
                    Direction::Forward => self.inner.find(|(_, event)| filter.accepts(event)),
                    Direction::Reverse => self.inner.rfind(|(_, event)| filter.accepts(event)),
                };
                // capacities are i32 so indices fit
                found.map(|(index, event)| (index as i32, event))
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                match self.filter {
                    Filter::All => self.inner.size_hint(),
                    Filter::Valid => (0, self.inner.size_hint().1),
                }
            }
        }

        impl<'a> std::iter::FusedIterator for $name<'a> {}
    };
}

iterator!(Iter, Iter, &'a SpikeEvent);
iterator!(IterMut, IterMut, &'a mut SpikeEvent);

impl<'a> Clone for Iter<'a> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            direction: self.direction,
            filter: self.filter,
        }
    }
}
