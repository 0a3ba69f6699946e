// ============================================================================
// ELEMENT BUILDER - Builder pattern para crear elementos fácilmente
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, create_element, on_click, set_attribute};

pub struct ElementBuilder {
    element: Element,
}

impl ElementBuilder {
    /// Crear nuevo builder para un elemento
    pub fn new(tag: &str) -> Result<Self, JsValue> {
        Ok(Self {
            element: create_element(tag)?,
        })
    }

    /// Establecer class name (reemplaza todas las clases)
    pub fn class(self, class: &str) -> Self {
        self.element.set_class_name(class);
        self
    }

    /// Establecer text content
    pub fn text(self, text: &str) -> Self {
        self.element.set_text_content(Some(text));
        self
    }

    /// Agregar hijo
    pub fn child(self, child: Element) -> Result<Self, JsValue> {
        append_child(&self.element, &child)?;
        Ok(self)
    }

    /// Agregar varios hijos en orden
    pub fn children(self, children: Vec<Element>) -> Result<Self, JsValue> {
        for child in children {
            append_child(&self.element, &child)?;
        }
        Ok(self)
    }

    /// Establecer atributo
    pub fn attr(self, name: &str, value: &str) -> Result<Self, JsValue> {
        set_attribute(&self.element, name, value)?;
        Ok(self)
    }

    /// Atributo booleano (`disabled`, `selected`, `required`)
    pub fn flag(self, name: &str, enabled: bool) -> Result<Self, JsValue> {
        if enabled {
            set_attribute(&self.element, name, "")?;
        }
        Ok(self)
    }

    /// Click handler directo en el builder
    pub fn on_click<F>(self, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(web_sys::MouseEvent) + 'static,
    {
        on_click(&self.element, handler)?;
        Ok(self)
    }

    /// Construir y retornar elemento
    pub fn build(self) -> Element {
        self.element
    }
}

/// Atajo: `<tag class=..>text</tag>`
pub fn text_el(tag: &str, class: &str, text: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new(tag)?.class(class).text(text).build())
}
