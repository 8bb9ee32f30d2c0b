//! Built-in property editors.

mod plain_text;
mod rich_text;

pub use plain_text::{
    PlainTextPropertyEditor, PlainTextValueConverter, TEXTAREA_ALIAS, TEXTBOX_ALIAS,
};
pub use rich_text::{
    RichTextConfiguration, RichTextConfigurationProvider, RichTextPropertyEditor,
    RichTextPropertyEditorBuilder, RichTextValueConverter, RICH_TEXT_ALIAS,
};
