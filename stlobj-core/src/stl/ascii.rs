/// ASCII STL reader and writer
///
/// The reader pulls one line at a time and parses each with a nom
/// combinator, so a mesh is never held in memory whole.
use std::io::{BufRead, Write};

use log::debug;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{space0, space1},
    combinator::{all_consuming, eof, map, rest},
    number::complete::double,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use super::FacetSource;
use crate::error::{Result, StlError};
use crate::geometry::{Facet, Vector3};

/// Where the reader stands between facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Next line is `facet normal ...` or `endsolid`.
    FacetOrEnd,
    /// `endsolid` seen, or an error was returned.
    End,
}

/// Streams facets out of an ASCII STL.
pub struct AsciiStlReader<R> {
    reader: R,
    name: Option<String>,
    line: String,
    line_no: usize,
    state: State,
}

impl<R: BufRead> AsciiStlReader<R> {
    /// Read the `solid <name>` header line; no facet is read yet.
    pub fn new(reader: R) -> Result<Self> {
        let mut this = Self {
            reader,
            name: None,
            line: String::new(),
            line_no: 0,
            state: State::FacetOrEnd,
        };

        this.next_line("solid <name>")?;
        let name = this.parse_line(solid_header, "solid <name>")?;
        this.name = Some(name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_owned);
        debug!("ASCII STL solid {:?}", this.name);

        Ok(this)
    }

    /// Load the next non-blank line, trimmed, into `self.line`.
    fn next_line(&mut self, expected: &str) -> Result<()> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Err(StlError::parse(self.line_no + 1, expected, "end of input"));
            }
            self.line_no += 1;

            let trimmed = self.line.trim();
            if !trimmed.is_empty() {
                self.line = trimmed.to_owned();
                return Ok(());
            }
        }
    }

    /// Run `parser` over the whole current line.
    fn parse_line<'s, T>(
        &'s self,
        parser: impl FnMut(&'s str) -> IResult<&'s str, T>,
        expected: &str,
    ) -> Result<T> {
        match all_consuming(terminated(parser, space0))(self.line.as_str()) {
            Ok((_, value)) => Ok(value),
            Err(_) => Err(StlError::parse(self.line_no, expected, self.line.as_str())),
        }
    }

    /// Expect one line matching `parser`.
    fn expect<T>(
        &mut self,
        parser: impl for<'s> FnMut(&'s str) -> IResult<&'s str, T>,
        expected: &str,
    ) -> Result<T> {
        self.next_line(expected)?;
        self.parse_line(parser, expected)
    }

    /// `FACET_NORMAL → OUTER_LOOP → VERTEX×3 → ENDLOOP → ENDFACET`, or `None` on `endsolid`.
    fn read_facet(&mut self) -> Result<Option<Facet>> {
        const FACET_OR_END: &str = "facet normal <nx> <ny> <nz> or endsolid";

        self.next_line(FACET_OR_END)?;
        if self.parse_line(endsolid, FACET_OR_END).is_ok() {
            return Ok(None);
        }
        let normal = self.parse_line(facet_normal, FACET_OR_END)?;

        self.expect(outer_loop, "outer loop")?;
        let v1 = self.expect(vertex, "vertex <x> <y> <z>")?;
        let v2 = self.expect(vertex, "vertex <x> <y> <z>")?;
        let v3 = self.expect(vertex, "vertex <x> <y> <z>")?;
        self.expect(keyword("endloop"), "endloop")?;
        self.expect(keyword("endfacet"), "endfacet")?;

        Ok(Some(Facet::new(normal, v1, v2, v3)))
    }
}

impl<R: BufRead> Iterator for AsciiStlReader<R> {
    type Item = Result<Facet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == State::End {
            return None;
        }
        match self.read_facet() {
            Ok(Some(facet)) => Some(Ok(facet)),
            Ok(None) => {
                self.state = State::End;
                None
            }
            Err(e) => {
                self.state = State::End;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> FacetSource for AsciiStlReader<R> {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

fn solid_header(input: &str) -> IResult<&str, &str> {
    preceded(tag("solid"), alt((preceded(space1, rest), eof)))(input)
}

fn endsolid(input: &str) -> IResult<&str, &str> {
    preceded(tag("endsolid"), alt((preceded(space1, rest), eof)))(input)
}

fn facet_normal(input: &str) -> IResult<&str, Vector3> {
    preceded(tuple((tag("facet"), space1, tag("normal"))), vector3)(input)
}

fn outer_loop(input: &str) -> IResult<&str, ()> {
    map(tuple((tag("outer"), space1, tag("loop"))), |_| ())(input)
}

fn vertex(input: &str) -> IResult<&str, Vector3> {
    preceded(tag("vertex"), vector3)(input)
}

fn keyword(word: &'static str) -> impl for<'s> FnMut(&'s str) -> IResult<&'s str, ()> {
    move |input: &str| map(tag(word), |_| ())(input)
}

fn vector3(input: &str) -> IResult<&str, Vector3> {
    let (input, x) = preceded(space1, double)(input)?;
    let (input, y) = preceded(space1, double)(input)?;
    let (input, z) = preceded(space1, double)(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

/// Write a facet stream as ASCII STL and return the number of facets written.
pub fn write_ascii_stl<W, S>(out: &mut W, mut source: S, name: Option<&str>) -> Result<u32>
where
    W: Write,
    S: FacetSource,
{
    let name = super::resolve_name(name, &source).to_owned();
    writeln!(out, "solid {}", name)?;

    let mut count: u32 = 0;
    for facet in source.by_ref() {
        let facet = facet?;
        writeln!(out, "  facet normal {}", facet.normal)?;
        writeln!(out, "    outer loop")?;
        for v in facet.vertices {
            writeln!(out, "      vertex {}", v)?;
        }
        writeln!(out, "    endloop")?;
        writeln!(out, "  endfacet")?;
        count = count.saturating_add(1);
    }

    writeln!(out, "endsolid {}", name)?;
    debug!("wrote {} facets as ASCII STL", count);
    Ok(count)
}
