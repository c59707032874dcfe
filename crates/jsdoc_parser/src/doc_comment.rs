//! The doc comment tag parser.
//!
//! Scans a `/** ... */` comment for `@tag` markers, splits the body into a
//! preamble and one segment per recognized tag, and parses each segment
//! according to its tag kind. Type annotations inside a segment are handed
//! to [`TypeExpressionParser`] by offset, so nothing is copied.
//!
//! Tag boundaries and free text are found with a byte cursor, separately
//! from the type tokenizer: descriptions are prose, not tokens.

use bumpalo::Bump;
use jsdoc_ast::node::*;
use jsdoc_ast::syntax_kind::SyntaxKind;
use jsdoc_core::alloc_vec_in;
use jsdoc_core::text::{TextRange, TextSpan};
use jsdoc_diagnostics::{messages, DiagnosticCollection};
use jsdoc_scanner::char_codes::{is_identifier_part, is_identifier_start};
use memchr::{memchr_iter, memmem};
use tracing::{debug, trace};

use crate::options::ParseOptions;
use crate::type_expression::TypeExpressionParser;

/// The tags this parser understands. Anything else is inert text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Type,
    Return,
    Param,
    Template,
    Typedef,
    Property,
}

impl TagKind {
    pub fn from_name(name: &str) -> Option<TagKind> {
        match name {
            "type" => Some(TagKind::Type),
            "return" | "returns" => Some(TagKind::Return),
            "param" | "arg" | "argument" => Some(TagKind::Param),
            "template" => Some(TagKind::Template),
            "typedef" => Some(TagKind::Typedef),
            "property" | "prop" => Some(TagKind::Property),
            _ => None,
        }
    }

    /// Tags that stay inside an open `@typedef`.
    fn continues_typedef(self) -> bool {
        matches!(self, TagKind::Type | TagKind::Property)
    }
}

bitflags::bitflags! {
    /// Tags that may appear at most once per comment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct SeenTags: u8 {
        const TYPE   = 1 << 0;
        const RETURN = 1 << 1;
    }
}

/// An `@name` marker found in the comment body.
#[derive(Debug, Clone, Copy)]
struct TagMarker {
    /// Offset of the `@`.
    at: usize,
    /// End of the tag name.
    name_end: usize,
    kind: TagKind,
}

/// A `@typedef` still collecting its `@type` and `@property` children.
struct OpenTypedef<'a> {
    pos: usize,
    end: usize,
    tag_name: Identifier<'a>,
    name: Identifier<'a>,
    type_expression: Option<&'a TypeExpression<'a>>,
    description: Option<&'a str>,
    properties: Vec<PropertyTag<'a>>,
}

/// Byte cursor over one tag segment.
struct CommentCursor<'a> {
    text: &'a str,
    pos: usize,
    end: usize,
}

impl<'a> CommentCursor<'a> {
    fn new(text: &'a str, pos: usize, end: usize) -> Self {
        Self { text, pos, end }
    }

    fn peek(&self) -> Option<u8> {
        if self.pos < self.end {
            Some(self.text.as_bytes()[self.pos])
        } else {
            None
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Skip whitespace, line breaks and the `*` decorating a new line.
    fn skip_trivia(&mut self) {
        let bytes = self.text.as_bytes();
        let mut line_start = false;
        while self.pos < self.end {
            match bytes[self.pos] {
                b'\n' | b'\r' => line_start = true,
                b' ' | b'\t' | 0x0b | 0x0c => {}
                b'*' if line_start && bytes.get(self.pos + 1) != Some(&b'/') => line_start = false,
                _ => return,
            }
            self.pos += 1;
        }
    }

    /// Consume an identifier, returning its bounds.
    fn scan_identifier(&mut self) -> Option<(usize, usize)> {
        let rest = &self.text[self.pos..self.end];
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if is_identifier_start(c) => {}
            _ => return None,
        }
        let len = chars
            .find(|&(_, c)| !is_identifier_part(c))
            .map_or(rest.len(), |(i, _)| i);
        let start = self.pos;
        self.pos += len;
        Some((start, self.pos))
    }

    /// The offset of the `]` closing the current bracket, or the segment end.
    fn find_closing_bracket(&self) -> usize {
        let mut depth = 0u32;
        for (i, byte) in self.text.as_bytes()[self.pos..self.end].iter().enumerate() {
            match byte {
                b'[' => depth += 1,
                b']' if depth == 0 => return self.pos + i,
                b']' => depth -= 1,
                _ => {}
            }
        }
        self.end
    }
}

/// Parses the tags of one doc comment.
pub struct TagParser<'a> {
    arena: &'a Bump,
    text: &'a str,
    options: ParseOptions,
    diagnostics: DiagnosticCollection,
    seen: SeenTags,
    tags: Vec<JSDocTag<'a>>,
    typedef: Option<OpenTypedef<'a>>,
}

impl<'a> TagParser<'a> {
    pub fn new(arena: &'a Bump, text: &'a str, options: &ParseOptions) -> Self {
        Self {
            arena,
            text,
            options: *options,
            diagnostics: DiagnosticCollection::new(),
            seen: SeenTags::empty(),
            tags: Vec::new(),
            typedef: None,
        }
    }

    /// Parse the comment at `text[start..start + length]`. Returns `None`
    /// when that span is not a `/** ... */` doc comment.
    pub fn parse(&mut self, start: usize, length: usize) -> Option<&'a DocComment<'a>> {
        let end = start.checked_add(length)?;
        let body = self.text.get(start..end)?;
        if !is_doc_comment(body) {
            debug!(start, length, "not a doc comment");
            return None;
        }

        let content_start = start + 3;
        let content_end = end - 2;
        let markers = self.find_tag_markers(content_start, content_end);
        trace!(tags = markers.len(), "found tag markers");

        let preamble_end = markers.first().map_or(content_end, |m| m.at);
        let preamble_start = skip_first_line_decoration(self.text, content_start, preamble_end);
        let preamble = clean_text(self.arena, self.text, preamble_start, preamble_end);

        for (i, marker) in markers.iter().enumerate() {
            let segment_end = markers.get(i + 1).map_or(content_end, |next| next.at);
            self.parse_tag(marker, segment_end);
        }
        self.close_typedef();

        let tags = alloc_vec_in(self.arena, std::mem::take(&mut self.tags));
        Some(self.arena.alloc(DocComment {
            data: NodeData::new(SyntaxKind::DocComment, start as u32, end as u32),
            preamble,
            tags,
        }))
    }

    /// All diagnostics reported so far, in source order.
    pub fn finish(mut self) -> DiagnosticCollection {
        self.diagnostics.sort();
        self.diagnostics
    }

    /// `@` counts as a tag marker at the start of the body or after
    /// whitespace or decoration, and only for a known tag name.
    fn find_tag_markers(&self, start: usize, end: usize) -> Vec<TagMarker> {
        let bytes = self.text.as_bytes();
        let mut markers = Vec::new();
        for i in memchr_iter(b'@', &bytes[start..end]) {
            let at = start + i;
            if at > start && !matches!(bytes[at - 1], b' ' | b'\t' | b'\n' | b'\r' | b'*') {
                continue;
            }
            let mut cursor = CommentCursor::new(self.text, at + 1, end);
            let Some((name_start, name_end)) = cursor.scan_identifier() else {
                continue;
            };
            if let Some(kind) = TagKind::from_name(&self.text[name_start..name_end]) {
                markers.push(TagMarker { at, name_end, kind });
            }
        }
        markers
    }

    fn parse_tag(&mut self, marker: &TagMarker, segment_end: usize) {
        let tag_name = self.identifier(marker.at + 1, marker.name_end);
        trace!(tag = tag_name.text, pos = marker.at, "parsing tag");
        if !marker.kind.continues_typedef() {
            self.close_typedef();
        }

        let mut cursor = CommentCursor::new(self.text, marker.name_end, segment_end);
        let tag_end = trim_decorated_end(self.text, marker.name_end, segment_end);
        match marker.kind {
            TagKind::Type => self.parse_type_tag(marker, tag_name, &mut cursor, tag_end),
            TagKind::Return => self.parse_return_tag(marker, tag_name, &mut cursor, tag_end),
            TagKind::Param => self.parse_param_tag(marker, tag_name, &mut cursor, tag_end),
            TagKind::Template => self.parse_template_tag(marker, tag_name, &mut cursor, tag_end),
            TagKind::Typedef => self.parse_typedef_tag(marker, tag_name, &mut cursor, tag_end),
            TagKind::Property => self.parse_property_tag(marker, tag_name, &mut cursor, tag_end),
        }
    }

    fn parse_type_tag(&mut self, marker: &TagMarker, tag_name: Identifier<'a>, cursor: &mut CommentCursor<'a>, tag_end: usize) {
        let type_expression = self.parse_type_expression(cursor);
        let description = clean_text(self.arena, self.text, cursor.pos, cursor.end);

        if let Some(typedef) = self.typedef.as_mut() {
            if typedef.type_expression.is_none() {
                typedef.type_expression = type_expression;
                typedef.description = typedef.description.or(description);
                typedef.end = typedef.end.max(tag_end);
            } else {
                self.report_duplicate(marker, &tag_name);
            }
            return;
        }

        if self.seen.contains(SeenTags::TYPE) {
            self.report_duplicate(marker, &tag_name);
        }
        self.seen.insert(SeenTags::TYPE);
        self.tags.push(JSDocTag::Type(TypeTag {
            data: self.tag_data(SyntaxKind::TypeTag, marker, tag_end),
            tag_name,
            type_expression,
            description,
        }));
    }

    fn parse_return_tag(&mut self, marker: &TagMarker, tag_name: Identifier<'a>, cursor: &mut CommentCursor<'a>, tag_end: usize) {
        if self.seen.contains(SeenTags::RETURN) {
            self.report_duplicate(marker, &tag_name);
        }
        self.seen.insert(SeenTags::RETURN);
        let type_expression = self.parse_type_expression(cursor);
        let description = clean_text(self.arena, self.text, cursor.pos, cursor.end);
        self.tags.push(JSDocTag::Return(ReturnTag {
            data: self.tag_data(SyntaxKind::ReturnTag, marker, tag_end),
            tag_name,
            type_expression,
            description,
        }));
    }

    /// `@param {T} name`, `@param name {T}`, `@param {T} [name = value]`.
    fn parse_param_tag(&mut self, marker: &TagMarker, tag_name: Identifier<'a>, cursor: &mut CommentCursor<'a>, tag_end: usize) {
        let mut type_expression = self.parse_type_expression(cursor);
        let is_name_first = type_expression.is_none();
        cursor.skip_trivia();

        let Some((name, is_bracketed, default_value)) = self.parse_param_name(cursor) else {
            self.report_missing_name(cursor);
            return;
        };
        if type_expression.is_none() {
            type_expression = self.parse_type_expression(cursor);
        }
        let description = clean_text(self.arena, self.text, cursor.pos, cursor.end);
        self.tags.push(JSDocTag::Param(ParamTag {
            data: self.tag_data(SyntaxKind::ParamTag, marker, tag_end),
            tag_name,
            type_expression,
            name,
            is_bracketed,
            default_value,
            description,
            is_name_first,
        }));
    }

    fn parse_param_name(&mut self, cursor: &mut CommentCursor<'a>) -> Option<(EntityName<'a>, bool, Option<&'a str>)> {
        if !cursor.eat(b'[') {
            return self.parse_entity_name(cursor).map(|name| (name, false, None));
        }

        cursor.skip_trivia();
        let name = self.parse_entity_name(cursor)?;
        cursor.skip_trivia();
        let mut default_value = None;
        if cursor.eat(b'=') {
            let value_end = cursor.find_closing_bracket();
            let value = self.text[cursor.pos..value_end].trim();
            if !value.is_empty() {
                default_value = Some(value);
            }
            cursor.pos = value_end;
        }
        if !cursor.eat(b']') {
            self.diagnostics.report(TextSpan::empty(cursor.pos as u32), &messages::_0_EXPECTED, &["]"]);
        }
        Some((name, true, default_value))
    }

    /// `a` or `a.b.c`.
    fn parse_entity_name(&mut self, cursor: &mut CommentCursor<'a>) -> Option<EntityName<'a>> {
        let (start, end) = cursor.scan_identifier()?;
        let mut name = EntityName::Identifier(self.identifier(start, end));
        while cursor.peek() == Some(b'.') {
            let dot = cursor.pos;
            cursor.pos += 1;
            let Some((right_start, right_end)) = cursor.scan_identifier() else {
                cursor.pos = dot;
                break;
            };
            let right = self.identifier(right_start, right_end);
            name = EntityName::QualifiedName(self.arena.alloc(QualifiedName {
                data: NodeData::new(SyntaxKind::QualifiedName, start as u32, right_end as u32),
                left: name,
                right,
            }));
        }
        Some(name)
    }

    /// `@template K, V description`
    fn parse_template_tag(&mut self, marker: &TagMarker, tag_name: Identifier<'a>, cursor: &mut CommentCursor<'a>, tag_end: usize) {
        let mut type_parameters = Vec::new();
        let mut last_comma = None;
        cursor.skip_trivia();
        loop {
            let Some((start, end)) = cursor.scan_identifier() else {
                match last_comma {
                    Some(comma) => self.diagnostics.report(
                        TextSpan::new(comma as u32, 1),
                        &messages::TEMPLATE_TRAILING_COMMA,
                        &[],
                    ),
                    None => self.diagnostics.report(
                        TextSpan::from_bounds(tag_name.data.pos(), tag_name.data.end()),
                        &messages::TYPE_PARAMETER_LIST_CANNOT_BE_EMPTY,
                        &[],
                    ),
                }
                break;
            };
            type_parameters.push(self.identifier(start, end));

            let after_name = cursor.pos;
            cursor.skip_trivia();
            if cursor.peek() == Some(b',') {
                last_comma = Some(cursor.pos);
                cursor.pos += 1;
                cursor.skip_trivia();
            } else {
                cursor.pos = after_name;
                break;
            }
        }

        if type_parameters.is_empty() {
            return;
        }
        let description = clean_text(self.arena, self.text, cursor.pos, cursor.end);
        self.tags.push(JSDocTag::Template(TemplateTag {
            data: self.tag_data(SyntaxKind::TemplateTag, marker, tag_end),
            tag_name,
            type_parameters: alloc_vec_in(self.arena, type_parameters),
            description,
        }));
    }

    /// `@typedef {T} name` or `@typedef name`; opens a typedef that collects
    /// the following `@type` and `@property` tags.
    fn parse_typedef_tag(&mut self, marker: &TagMarker, tag_name: Identifier<'a>, cursor: &mut CommentCursor<'a>, tag_end: usize) {
        let type_expression = self.parse_type_expression(cursor);
        cursor.skip_trivia();
        let Some((start, end)) = cursor.scan_identifier() else {
            self.report_missing_name(cursor);
            return;
        };
        self.typedef = Some(OpenTypedef {
            pos: marker.at,
            end: tag_end,
            tag_name,
            name: self.identifier(start, end),
            type_expression,
            description: clean_text(self.arena, self.text, cursor.pos, cursor.end),
            properties: Vec::new(),
        });
    }

    /// `@property {T} name description`
    fn parse_property_tag(&mut self, marker: &TagMarker, tag_name: Identifier<'a>, cursor: &mut CommentCursor<'a>, tag_end: usize) {
        let Some(type_expression) = self.parse_type_expression(cursor) else {
            let written = format!("@{}", tag_name.text);
            self.diagnostics.report(
                TextSpan::from_bounds(marker.at as u32, marker.name_end as u32),
                &messages::TAG_0_REQUIRES_A_TYPE,
                &[&written],
            );
            return;
        };
        cursor.skip_trivia();
        let Some((start, end)) = cursor.scan_identifier() else {
            self.report_missing_name(cursor);
            return;
        };
        let property = PropertyTag {
            data: self.tag_data(SyntaxKind::PropertyTag, marker, tag_end),
            tag_name,
            type_expression,
            name: self.identifier(start, end),
            description: clean_text(self.arena, self.text, cursor.pos, cursor.end),
        };
        match self.typedef.as_mut() {
            Some(typedef) => {
                typedef.end = typedef.end.max(tag_end);
                typedef.properties.push(property);
            }
            None => self.tags.push(JSDocTag::Property(property)),
        }
    }

    fn close_typedef(&mut self) {
        let Some(typedef) = self.typedef.take() else {
            return;
        };
        trace!(name = typedef.name.text, properties = typedef.properties.len(), "closing typedef");
        self.tags.push(JSDocTag::Typedef(TypedefTag {
            data: NodeData::new(SyntaxKind::TypedefTag, typedef.pos as u32, typedef.end as u32),
            tag_name: typedef.tag_name,
            name: typedef.name,
            type_expression: typedef.type_expression,
            description: typedef.description,
            properties: alloc_vec_in(self.arena, typedef.properties),
        }));
    }

    /// Parse a `{...}` type at the cursor, if there is one, and move the
    /// cursor past it.
    fn parse_type_expression(&mut self, cursor: &mut CommentCursor<'a>) -> Option<&'a TypeExpression<'a>> {
        cursor.skip_trivia();
        if cursor.peek() != Some(b'{') {
            return None;
        }
        let mut parser = TypeExpressionParser::new(self.arena, self.text, cursor.pos, cursor.end, &self.options);
        parser.set_comment_mode(true);
        let type_expression = parser.parse_type_expression();
        let (end, diagnostics) = parser.finish();
        self.diagnostics.extend(diagnostics);
        cursor.pos = (end as usize).max(cursor.pos + 1);
        type_expression
    }

    fn report_missing_name(&mut self, cursor: &CommentCursor<'a>) {
        self.diagnostics.report(TextSpan::empty(cursor.pos as u32), &messages::TAG_NAME_EXPECTED, &[]);
    }

    fn report_duplicate(&mut self, marker: &TagMarker, tag_name: &Identifier<'a>) {
        let written = format!("@{}", tag_name.text);
        self.diagnostics.report(
            TextSpan::from_bounds(marker.at as u32, marker.name_end as u32),
            &messages::TAG_0_ALREADY_SPECIFIED,
            &[&written],
        );
    }

    fn identifier(&self, start: usize, end: usize) -> Identifier<'a> {
        Identifier {
            data: NodeData::new(SyntaxKind::Identifier, start as u32, end as u32),
            text: &self.text[start..end],
        }
    }

    fn tag_data(&self, kind: SyntaxKind, marker: &TagMarker, tag_end: usize) -> NodeData {
        NodeData::new(kind, marker.at as u32, tag_end.max(marker.name_end) as u32)
    }
}

/// Whether `body` is a whole `/** ... */` comment. `/***/` and `/*** */`
/// are ordinary comments.
pub fn is_doc_comment(body: &str) -> bool {
    let bytes = body.as_bytes();
    bytes.len() >= 5 && body.starts_with("/**") && bytes[3] != b'*' && body.ends_with("*/")
}

/// Locate every `/** ... */` doc comment in `text`.
///
/// Only comment delimiters are recognized; there is no lexing of the
/// surrounding code, so a `/**` inside a string literal is found too.
pub fn find_doc_comments(text: &str) -> Vec<TextRange> {
    let bytes = text.as_bytes();
    let mut ranges = Vec::new();
    let mut from = 0;
    while let Some(offset) = memmem::find(&bytes[from..], b"/*") {
        let open = from + offset;
        let Some(close) = memmem::find(&bytes[open + 2..], b"*/") else {
            break;
        };
        let end = open + 2 + close + 2;
        if is_doc_comment(&text[open..end]) {
            ranges.push(TextRange::new(open as u32, end as u32));
        }
        from = end;
    }
    ranges
}

/// Free text in `text[start..end]` with line decoration removed and
/// surrounding whitespace trimmed. Single-line text borrows the source;
/// multi-line text is rebuilt in the arena.
fn clean_text<'a>(arena: &'a Bump, text: &'a str, start: usize, end: usize) -> Option<&'a str> {
    let raw = text.get(start..end)?;
    if !raw.contains('\n') {
        let trimmed = raw.trim();
        return (!trimmed.is_empty()).then_some(trimmed);
    }

    let lines: Vec<&str> = raw
        .lines()
        .enumerate()
        .map(|(i, line)| if i == 0 { line } else { strip_decoration(line) })
        .collect();
    let joined = lines.join("\n");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(arena.alloc_str(trimmed))
    }
}

/// `/** * text` decorates the first line too.
fn skip_first_line_decoration(text: &str, start: usize, end: usize) -> usize {
    let bytes = text.as_bytes();
    let mut pos = start;
    while pos < end && matches!(bytes[pos], b' ' | b'\t') {
        pos += 1;
    }
    if pos < end && bytes[pos] == b'*' {
        pos + 1
    } else {
        start
    }
}

/// Leading whitespace, one `*` and one space.
fn strip_decoration(line: &str) -> &str {
    let rest = line.trim_start();
    match rest.strip_prefix('*') {
        Some(after) => after.strip_prefix(' ').unwrap_or(after),
        None => rest,
    }
}

/// The end of the meaningful text in `text[start..end]`: trailing
/// whitespace and lines holding only decoration are dropped.
fn trim_decorated_end(text: &str, start: usize, end: usize) -> usize {
    let bytes = text.as_bytes();
    let mut end = end;
    loop {
        while end > start && bytes[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        if end > start && bytes[end - 1] == b'*' {
            let line_start = bytes[start..end - 1]
                .iter()
                .rposition(|&b| b == b'\n' || b == b'\r')
                .map(|i| start + i + 1);
            if let Some(line_start) = line_start {
                if bytes[line_start..end - 1].iter().all(|&b| b == b' ' || b == b'\t') {
                    end = line_start;
                    continue;
                }
            }
        }
        return end;
    }
}
