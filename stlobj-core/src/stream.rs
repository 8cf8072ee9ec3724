/// Facet source decorated with an optional vertex transform
use crate::error::Result;
use crate::geometry::Facet;
use crate::stl::FacetSource;
use crate::transform::Transform;

/// Applies a [`Transform`] to each facet as it is pulled.
///
/// Without a transform facets pass through unchanged. Either way the stream
/// is itself a [`FacetSource`], so writers cannot tell the difference.
pub struct FacetStream<S> {
    source: S,
    transform: Option<Transform>,
}

impl<S: FacetSource> FacetStream<S> {
    pub fn new(source: S, transform: Option<Transform>) -> Self {
        Self { source, transform }
    }
}

impl<S: FacetSource> Iterator for FacetStream<S> {
    type Item = Result<Facet>;

    fn next(&mut self) -> Option<Self::Item> {
        let facet = self.source.next()?;
        Some(match &self.transform {
            Some(transform) => facet.map(|f| transform.apply_facet(&f)),
            None => facet,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

impl<S: FacetSource> FacetSource for FacetStream<S> {
    fn name(&self) -> Option<&str> {
        self.source.name()
    }
}
