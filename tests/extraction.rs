use twb_audit::AuditError;
use twb_audit::catalog::FieldCatalog;
use twb_audit::extract;
use twb_audit::io::twb_read;
use twb_audit::resolve::{resolve_formula, split_formula};

fn catalog(entries: &[(&str, &str)]) -> FieldCatalog {
    FieldCatalog::from_entries(
        entries
            .iter()
            .map(|(identifier, caption)| (identifier.to_string(), caption.to_string())),
    )
}

#[test]
fn comment_lines_separate_from_formula_content() {
    let split = split_formula("// note\r\n1+1");
    assert_eq!(split.comment, "// note ");
    assert_eq!(split.body, "1+1 ");
}

#[test]
fn resolution_is_deterministic_across_runs() {
    let catalog = catalog(&[("[calc1]", "[Alpha]"), ("[calc2]", "[Beta]")]);
    let first = resolve_formula("[calc1]+[calc2]", &catalog);
    let second = resolve_formula("[calc1]+[calc2]", &catalog);
    assert_eq!(first, "[Alpha]+[Beta]");
    assert_eq!(first, second);
}

#[test]
fn formula_without_catalog_references_is_left_untouched() {
    let catalog = catalog(&[("[calc1]", "[Alpha]")]);
    let split = split_formula("SUM([Sales])\r\n+ 1");
    assert_eq!(resolve_formula(&split.body, &catalog), "SUM([Sales]) + 1 ");
}

#[test]
fn embedded_identifiers_resolve_longest_first() {
    // calc1 is a prefix of calc12; insertion order must not matter.
    let forward = catalog(&[("calc1", "[Alpha]"), ("calc12", "[Beta]")]);
    let reverse = catalog(&[("calc12", "[Beta]"), ("calc1", "[Alpha]")]);
    assert_eq!(resolve_formula("calc12+calc1", &forward), "[Beta]+[Alpha]");
    assert_eq!(resolve_formula("calc12+calc1", &reverse), "[Beta]+[Alpha]");
}

const SELECTION_TWB: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<workbook>
  <datasources>
    <datasource name='federated.0a1b2c' caption='Sales'>
      <column caption='Total' name='[calc1]' type='quantitative'>
        <calculation class='tableau' formula='1+1'/>
      </column>
      <column caption='Region' name='[Region]' type='nominal'/>
      <column caption='Top N' name='[Parameter 1]' type='integer'>
        <calculation class='tableau' formula='10'/>
      </column>
    </datasource>
  </datasources>
</workbook>"#;

#[test]
fn catalog_excludes_plain_and_parameter_columns() {
    let datasources = twb_read::parse_datasources(SELECTION_TWB).expect("workbook parsed");
    let catalog = FieldCatalog::from_datasources(&datasources);
    let entries: Vec<_> = catalog.entries().collect();
    assert_eq!(entries, vec![("[calc1]", "[Total]")]);
}

const DUPLICATED_TWB: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<workbook>
  <datasources>
    <datasource name='federated.0a1b2c' caption='Sales'>
      <column caption='Total' name='[calc1]' type='quantitative'>
        <calculation class='tableau' formula='1+1'/>
      </column>
    </datasource>
    <datasource name='federated.3d4e5f' caption='Returns'>
      <column caption='Total' name='[calc1]' type='quantitative'>
        <calculation class='tableau' formula='1+1'/>
      </column>
    </datasource>
  </datasources>
</workbook>"#;

#[test]
fn duplicate_fields_collapse_to_one_record() {
    let datasources = twb_read::parse_datasources(DUPLICATED_TWB).expect("workbook parsed");
    let catalog = FieldCatalog::from_datasources(&datasources);
    let fields = extract::calculated_fields(&datasources, &catalog);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "Total");
    assert_eq!(fields[0].remote_name, "[calc1]");
}

const PARAMETER_TWB: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<workbook>
  <datasources>
    <datasource name='Parameters' caption='Parameters'>
      <column alias='Level' caption='Choose Level' name='[Parameter 1]' param-domain-type='list' type='integer'>
        <calculation class='tableau' formula='1'/>
        <aliases>
          <alias key='1' value='Low'/>
          <alias key='2' value='High'/>
        </aliases>
      </column>
    </datasource>
  </datasources>
</workbook>"#;

#[test]
fn parameter_members_flatten_to_key_value_lines() {
    let datasources = twb_read::parse_datasources(PARAMETER_TWB).expect("workbook parsed");
    let parameters = extract::parameters(&datasources).expect("parameters extracted");
    assert_eq!(parameters.len(), 1);

    let parameter = &parameters[0];
    assert_eq!(parameter.alias, "Level");
    assert_eq!(parameter.name, "Choose Level");
    assert_eq!(parameter.remote_name, "[Parameter 1]");
    assert_eq!(parameter.display_type, "list");
    assert_eq!(parameter.data_type, "integer");
    assert_eq!(parameter.values, "1=Low\n2=High");
    assert_eq!(parameter.formula, "1");
}

#[test]
fn parameter_missing_required_attribute_is_fatal() {
    let xml = r#"<workbook>
      <datasource name='Parameters'>
        <column caption='Choose Level' name='[Parameter 1]'>
          <calculation class='tableau' formula='1'/>
        </column>
      </datasource>
    </workbook>"#;
    let datasources = twb_read::parse_datasources(xml).expect("workbook parsed");
    let error = extract::parameters(&datasources).expect_err("missing attribute rejected");
    assert!(matches!(
        error,
        AuditError::MissingAttribute { attribute, .. } if attribute == "type"
    ));
}

#[test]
fn malformed_xml_is_rejected() {
    let error = twb_read::parse_datasources("<workbook><datasource></column></workbook>")
        .expect_err("mismatched tags rejected");
    assert!(matches!(error, AuditError::Xml(_)));
}
