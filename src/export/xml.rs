use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use crate::{
    collector::{FieldRecord, MethodRecord, PropertyRecord, TypeRecord},
    resolver::DependencyLedger,
    Error, Result,
};

type XmlWriter = Writer<Vec<u8>>;

pub(crate) fn render(ledger: &DependencyLedger, types: &[TypeRecord]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )?;
    start(&mut writer, BytesStart::new("Root"))?;
    start(&mut writer, BytesStart::new("ExportData"))?;

    dependencies(&mut writer, "ResolvedDependencies", ledger.resolved())?;
    dependencies(&mut writer, "IgnoredDependencies", ledger.ignored())?;

    list(&mut writer, "Types", types, type_record)?;

    end(&mut writer, "ExportData")?;
    end(&mut writer, "Root")?;

    String::from_utf8(writer.into_inner()).map_err(|error| Error::Serialization(error.to_string()))
}

fn dependencies(writer: &mut XmlWriter, tag: &str, names: &[String]) -> Result<()> {
    list(writer, tag, names, |writer, name| {
        start(writer, BytesStart::new("Dependency"))?;
        emit(writer, Event::Text(BytesText::new(name)))?;
        end(writer, "Dependency")
    })
}

fn type_record(writer: &mut XmlWriter, record: &TypeRecord) -> Result<()> {
    let mut element = BytesStart::new("Type");
    element.push_attribute(("Name", record.name.as_str()));
    if let Some(namespace) = &record.namespace {
        element.push_attribute(("Namespace", namespace.as_str()));
    }
    element.push_attribute(("FullName", record.full_name.as_str()));
    element.push_attribute(("Kind", record.kind.as_str()));

    start(writer, element)?;
    list(writer, "Methods", &record.methods, method)?;
    list(writer, "Properties", &record.properties, property)?;
    list(writer, "Fields", &record.fields, field)?;
    end(writer, "Type")
}

fn method(writer: &mut XmlWriter, method: &MethodRecord) -> Result<()> {
    let mut element = BytesStart::new("Method");
    element.push_attribute(("Name", method.name.as_str()));
    element.push_attribute(("ReturnType", method.return_type.as_str()));
    element.push_attribute(("IsPublic", flag(method.is_public)));

    start(writer, element)?;
    list(writer, "Parameters", &method.parameters, |writer, parameter| {
        let mut element = BytesStart::new("Parameter");
        element.push_attribute(("Name", parameter.name.as_str()));
        element.push_attribute(("Type", parameter.type_name.as_str()));
        emit(writer, Event::Empty(element))
    })?;
    end(writer, "Method")
}

fn property(writer: &mut XmlWriter, property: &PropertyRecord) -> Result<()> {
    let mut element = BytesStart::new("Property");
    element.push_attribute(("Name", property.name.as_str()));
    element.push_attribute(("Type", property.type_name.as_str()));
    element.push_attribute(("CanRead", flag(property.can_read)));
    element.push_attribute(("CanWrite", flag(property.can_write)));
    emit(writer, Event::Empty(element))
}

fn field(writer: &mut XmlWriter, field: &FieldRecord) -> Result<()> {
    let mut element = BytesStart::new("Field");
    element.push_attribute(("Name", field.name.as_str()));
    element.push_attribute(("Type", field.type_name.as_str()));
    element.push_attribute(("IsPublic", flag(field.is_public)));
    emit(writer, Event::Empty(element))
}

/// `<tag>` with one child per item, or `<tag/>` for no items.
fn list<T>(
    writer: &mut XmlWriter,
    tag: &str,
    items: &[T],
    mut item: impl FnMut(&mut XmlWriter, &T) -> Result<()>,
) -> Result<()> {
    if items.is_empty() {
        return emit(writer, Event::Empty(BytesStart::new(tag)));
    }

    start(writer, BytesStart::new(tag))?;
    for entry in items {
        item(writer, entry)?;
    }
    end(writer, tag)
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn start(writer: &mut XmlWriter, element: BytesStart<'_>) -> Result<()> {
    emit(writer, Event::Start(element))
}

fn end(writer: &mut XmlWriter, tag: &str) -> Result<()> {
    emit(writer, Event::End(BytesEnd::new(tag)))
}

fn emit(writer: &mut XmlWriter, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|error| Error::Serialization(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample;

    #[test]
    fn document() {
        let (ledger, types) = sample();
        let xml = render(&ledger, &types).unwrap();

        assert!(xml.starts_with(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Root>\n  <ExportData>"
        ));
        assert!(xml.contains(
            "<ResolvedDependencies>\n      <Dependency>Helper</Dependency>\n    </ResolvedDependencies>"
        ));
        assert!(xml.contains("<Dependency>Contoso.resources</Dependency>"));
        assert!(xml.contains(
            "<Type Name=\"Greeter\" Namespace=\"Contoso\" FullName=\"Contoso.Greeter\" Kind=\"Class\">"
        ));
        assert!(xml.contains("<Method Name=\"Greet\" ReturnType=\"string\" IsPublic=\"true\">"));
        assert!(xml.contains("<Parameter Name=\"times\" Type=\"int\"/>"));
        assert!(xml.contains(
            "<Property Name=\"Count\" Type=\"int\" CanRead=\"true\" CanWrite=\"false\"/>"
        ));
        assert!(xml.contains("<Field Name=\"Prefix\" Type=\"string\" IsPublic=\"true\"/>"));

        // global namespace, no members
        assert!(xml.contains("<Type Name=\"Color\" FullName=\"Color\" Kind=\"Enum\">"));
        assert!(xml.contains("<Methods/>"));
        assert!(xml.trim_end().ends_with("</Root>"));
    }

    #[test]
    fn escaping() {
        let (ledger, mut types) = sample();
        types[0].methods[0].return_type = "List<int>".into();
        types[0].fields[0].name = "a&b".into();

        let xml = render(&ledger, &types).unwrap();
        assert!(xml.contains("ReturnType=\"List&lt;int&gt;\""));
        assert!(xml.contains("Name=\"a&amp;b\""));
    }
}
