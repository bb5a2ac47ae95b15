use std::fmt::Write;

use crate::{collector::TypeRecord, resolver::DependencyLedger};

pub(crate) fn render(ledger: &DependencyLedger, types: &[TypeRecord]) -> String {
    let mut out = String::new();

    // writing into a String does not fail
    let _ = write_summary(&mut out, ledger);
    for record in types {
        let _ = write_type(&mut out, record);
    }

    out
}

fn write_summary(out: &mut String, ledger: &DependencyLedger) -> std::fmt::Result {
    writeln!(out, "=== 依赖解析摘要 ===")?;
    writeln!(out, "成功解析的依赖: {}", ledger.resolved().join(", "))?;
    writeln!(out, "忽略的系统/资源依赖: {}", ledger.ignored().join(", "))?;
    writeln!(out, "===================")?;
    writeln!(out)
}

fn write_type(out: &mut String, record: &TypeRecord) -> std::fmt::Result {
    writeln!(out, "类型: {}", record.full_name)?;
    writeln!(out, "种类: {}", record.kind.label())?;
    writeln!(out)?;

    if !record.properties.is_empty() {
        writeln!(out, "属性:")?;
        for property in &record.properties {
            writeln!(
                out,
                "  {} {} {{ {} {} }}",
                property.type_name,
                property.name,
                if property.can_read { "get;" } else { "" },
                if property.can_write { "set;" } else { "" }
            )?;
        }
        writeln!(out)?;
    }

    if !record.fields.is_empty() {
        writeln!(out, "字段:")?;
        for field in &record.fields {
            writeln!(
                out,
                "  {} {} {}",
                visibility(field.is_public),
                field.type_name,
                field.name
            )?;
        }
        writeln!(out)?;
    }

    if !record.methods.is_empty() {
        writeln!(out, "方法:")?;
        for method in &record.methods {
            let parameters = method
                .parameters
                .iter()
                .map(|parameter| format!("{} {}", parameter.type_name, parameter.name))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                out,
                "  {} {} {}({})",
                visibility(method.is_public),
                method.return_type,
                method.name,
                parameters
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", "-".repeat(80))?;
    writeln!(out)
}

fn visibility(is_public: bool) -> &'static str {
    if is_public {
        "public"
    } else {
        "non-public"
    }
}
