//! Paginated PDF layout for parsed note blocks.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use super::markdown::Block;
use super::RenderError;

const POINTS_PER_INCH: f32 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
}

impl Face {
    fn resource_key(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Face::Regular => "Helvetica",
            Face::Bold => "Helvetica-Bold",
        }
    }

    /// Average glyph advance as a fraction of the font size.
    fn width_factor(self) -> f32 {
        match self {
            Face::Regular => 0.52,
            Face::Bold => 0.55,
        }
    }
}

/// Page geometry and type sizes, in points.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_side: f32,
    pub spacer: f32,
    pub heading_sizes: [f32; 3],
    pub body_size: f32,
    pub line_spacing: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: 8.5 * POINTS_PER_INCH,
            height: 11.0 * POINTS_PER_INCH,
            margin_top: 0.5 * POINTS_PER_INCH,
            margin_bottom: 0.5 * POINTS_PER_INCH,
            margin_side: POINTS_PER_INCH,
            spacer: 0.2 * POINTS_PER_INCH,
            heading_sizes: [18.0, 16.0, 14.0],
            body_size: 12.0,
            line_spacing: 1.25,
        }
    }
}

impl PageLayout {
    fn text_width(&self) -> f32 {
        self.width - 2.0 * self.margin_side
    }

    fn style_for(&self, block: &Block) -> Option<(Face, f32)> {
        match block {
            Block::Heading { level, .. } => {
                let index = usize::from((*level).clamp(1, 3) - 1);
                Some((Face::Bold, self.heading_sizes[index]))
            }
            Block::Bullet(_) | Block::Paragraph(_) => Some((Face::Regular, self.body_size)),
            Block::Spacer => None,
        }
    }
}

pub struct PdfRenderer {
    layout: PageLayout,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new(PageLayout::default())
    }
}

impl PdfRenderer {
    pub fn new(layout: PageLayout) -> Self {
        Self { layout }
    }

    pub fn render(&self, blocks: &[Block], title: &str) -> Result<Vec<u8>, RenderError> {
        let mut writer = PageWriter::new(&self.layout, title);

        for block in blocks {
            match (block.text(), self.layout.style_for(block)) {
                (Some(text), Some((face, size))) => {
                    for line in wrap_text(text, face, size, self.layout.text_width()) {
                        writer.write_line(&line, face, size)?;
                    }
                    writer.advance(size * (self.layout.line_spacing - 1.0))?;
                }
                _ => writer.advance(self.layout.spacer)?,
            }
        }

        writer.finish()
    }
}

struct PageWriter<'a> {
    layout: &'a PageLayout,
    doc: Document,
    font_ids: [ObjectId; 2],
    page_ids: Vec<ObjectId>,
    operations: Vec<Operation>,
    cursor: f32,
}

impl<'a> PageWriter<'a> {
    fn new(layout: &'a PageLayout, title: &str) -> Self {
        let mut doc = Document::with_version("1.5");

        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_win_ansi(title)),
            "Producer" => Object::string_literal("note-maker-server"),
        });
        doc.trailer.set("Info", Object::Reference(info_id));

        let font_ids = [Face::Regular, Face::Bold].map(|face| {
            doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            })
        });

        Self {
            layout,
            doc,
            font_ids,
            page_ids: Vec::new(),
            operations: Vec::new(),
            cursor: layout.height - layout.margin_top,
        }
    }

    fn bottom(&self) -> f32 {
        self.layout.margin_bottom
    }

    fn write_line(&mut self, text: &str, face: Face, size: f32) -> Result<(), RenderError> {
        let line_height = size * self.layout.line_spacing;
        if self.cursor - line_height < self.bottom() {
            self.break_page()?;
        }
        self.cursor -= size;

        self.operations.push(Operation::new("BT", vec![]));
        self.operations.push(Operation::new(
            "Tf",
            vec![face.resource_key().into(), size.into()],
        ));
        self.operations.push(Operation::new(
            "Td",
            vec![self.layout.margin_side.into(), self.cursor.into()],
        ));
        self.operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(text))],
        ));
        self.operations.push(Operation::new("ET", vec![]));

        self.cursor -= line_height - size;
        Ok(())
    }

    fn advance(&mut self, amount: f32) -> Result<(), RenderError> {
        if self.cursor - amount < self.bottom() {
            self.break_page()
        } else {
            self.cursor -= amount;
            Ok(())
        }
    }

    fn break_page(&mut self) -> Result<(), RenderError> {
        self.flush_page()?;
        self.cursor = self.layout.height - self.layout.margin_top;
        Ok(())
    }

    fn flush_page(&mut self) -> Result<(), RenderError> {
        let operations = std::mem::take(&mut self.operations);
        let content = Content { operations }
            .encode()
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content));

        let mut fonts = Dictionary::new();
        for (face, id) in [Face::Regular, Face::Bold].iter().zip(self.font_ids) {
            fonts.set(face.resource_key(), Object::Reference(id));
        }

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![
                0.into(),
                0.into(),
                self.layout.width.into(),
                self.layout.height.into(),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => Object::Dictionary(fonts),
            },
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>, RenderError> {
        if !self.operations.is_empty() || self.page_ids.is_empty() {
            self.flush_page()?;
        }

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let pages_id = self.doc.add_object(dictionary! {
            "Type" => "Pages",
            "Count" => self.page_ids.len() as i64,
            "Kids" => kids,
        });

        for page_id in &self.page_ids {
            if let Ok(Object::Dictionary(page)) = self.doc.get_object_mut(*page_id) {
                page.set("Parent", Object::Reference(pages_id));
            }
        }

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        self.doc.trailer.set("Root", Object::Reference(catalog_id));
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| RenderError::Write(e.to_string()))?;
        Ok(bytes)
    }
}

fn estimated_width(text: &str, face: Face, size: f32) -> f32 {
    text.chars().count() as f32 * face.width_factor() * size
}

/// Greedy word wrap; words wider than a full line are split by character.
fn wrap_text(text: &str, face: Face, size: f32, max_width: f32) -> Vec<String> {
    let max_chars = ((max_width / (face.width_factor() * size)).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if estimated_width(&candidate, face, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(max_chars).peekable();
        while let Some(chunk) = chunks.next() {
            let piece: String = chunk.iter().collect();
            if chunks.peek().is_some() {
                lines.push(piece);
            } else {
                current = piece;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Map text onto the WinAnsi code page used by the built-in fonts.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}
