//! DOCX packaging of a [`PortableDocument`] with `docx-rs`.

use std::io::Cursor;

use docx_rs::{Docx, Pic, Run};

use crate::export::ExportError;
use crate::export::model::{Paragraph, PortableDocument};

pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// English Metric Units per pixel at 96 DPI
pub const EMU_PER_PIXEL: u32 = 9525;

pub fn to_docx(document: &PortableDocument) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new();
    for paragraph in &document.paragraphs {
        let mut out = docx_rs::Paragraph::new();
        match paragraph {
            Paragraph::Text(runs) => {
                for run in runs {
                    out = out.add_run(Run::new().add_text(run.text.as_str()));
                }
            }
            Paragraph::Image(image) => {
                let pic = Pic::new_with_dimensions(image.data.clone(), image.width, image.height)
                    .size(
                        image.width.saturating_mul(EMU_PER_PIXEL),
                        image.height.saturating_mul(EMU_PER_PIXEL),
                    );
                out = out.add_run(Run::new().add_image(pic));
            }
        }
        docx = docx.add_paragraph(out);
    }

    let mut buffer = Vec::new();
    docx.build()
        .pack(&mut Cursor::new(&mut buffer))
        .map_err(|e| ExportError::Serialize(format!("Failed to pack DOCX: {e}")))?;
    Ok(buffer)
}
