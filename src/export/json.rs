use serde::Serialize;

use crate::{collector::TypeRecord, resolver::DependencyLedger, Result};

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Document<'a> {
    resolved_dependencies: &'a [String],
    ignored_dependencies: &'a [String],
    types: &'a [TypeRecord],
}

pub(crate) fn render(ledger: &DependencyLedger, types: &[TypeRecord]) -> Result<String> {
    let document = Document {
        resolved_dependencies: ledger.resolved(),
        ignored_dependencies: ledger.ignored(),
        types,
    };

    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::export::tests::sample;

    #[test]
    fn document() {
        let (ledger, types) = sample();
        let rendered = render(&ledger, &types).unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["ResolvedDependencies"], json!(["Helper"]));
        assert_eq!(
            value["IgnoredDependencies"],
            json!(["System.Runtime", "Contoso.resources"])
        );

        let greeter = &value["Types"][0];
        assert_eq!(greeter["FullName"], "Contoso.Greeter");
        assert_eq!(greeter["Kind"], "Class");
        assert_eq!(greeter["Methods"][0]["Parameters"][1], json!({"Name": "times", "Type": "int"}));
        assert_eq!(greeter["Properties"][0]["CanRead"], true);

        let color = &value["Types"][1];
        assert_eq!(color["Namespace"], Value::Null);
        assert_eq!(color["Methods"], json!([]));
        assert_eq!(color["Fields"], json!([]));
    }

    #[test]
    fn key_order() {
        let (ledger, types) = sample();
        let rendered = render(&ledger, &types).unwrap();

        let resolved = rendered.find("\"ResolvedDependencies\"").unwrap();
        let ignored = rendered.find("\"IgnoredDependencies\"").unwrap();
        let listed = rendered.find("\"Types\"").unwrap();
        assert!(resolved < ignored && ignored < listed);

        let name = rendered.find("\"Name\": \"Greeter\"").unwrap();
        let full_name = rendered.find("\"FullName\"").unwrap();
        assert!(name < full_name);
        // two space indentation
        assert!(rendered.starts_with("{\n  \"ResolvedDependencies\": [\n    \"Helper\"\n  ],"));
    }
}
