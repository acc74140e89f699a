use std::path::{Path, PathBuf};

/// A small weather/play decision-tree model exercising every input shape:
/// radio (few options), slider (wide range), combo (short range) and a
/// second radio group, plus set and compound predicates in the tree.
pub const WEATHER_MODEL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PMML xmlns="http://www.dmg.org/PMML-4_2" version="4.2">
  <DataDictionary numberOfFields="5">
    <DataField name="outlook" optype="categorical" dataType="string">
      <Value value="sunny"/>
      <Value value="overcast"/>
      <Value value="rain"/>
    </DataField>
    <DataField name="temperature" optype="continuous" dataType="double">
      <Interval closure="closedClosed" leftMargin="60" rightMargin="100"/>
    </DataField>
    <DataField name="humidity" optype="continuous" dataType="double">
      <Interval closure="closedClosed" leftMargin="0" rightMargin="1"/>
    </DataField>
    <DataField name="windy" optype="categorical" dataType="string">
      <Value value="false"/>
      <Value value="true"/>
    </DataField>
    <DataField name="play" optype="categorical" dataType="string">
      <Value value="yes"/>
      <Value value="no"/>
    </DataField>
  </DataDictionary>
  <TreeModel modelName="play" functionName="classification">
    <MiningSchema>
      <MiningField name="outlook"/>
      <MiningField name="temperature"/>
      <MiningField name="humidity"/>
      <MiningField name="windy"/>
      <MiningField name="play" usageType="target"/>
    </MiningSchema>
    <Output>
      <OutputField name="predicted_play" feature="predictedValue"/>
    </Output>
    <Node score="yes">
      <True/>
      <Node>
        <SimplePredicate field="outlook" operator="equal" value="sunny"/>
        <Node score="yes">
          <SimplePredicate field="humidity" operator="lessOrEqual" value="0.7"/>
          <ScoreDistribution value="yes" recordCount="6"/>
          <ScoreDistribution value="no" recordCount="2"/>
        </Node>
        <Node score="no">
          <SimplePredicate field="humidity" operator="greaterThan" value="0.7"/>
        </Node>
      </Node>
      <Node score="yes">
        <SimplePredicate field="outlook" operator="equal" value="overcast"/>
      </Node>
      <Node>
        <SimplePredicate field="outlook" operator="equal" value="rain"/>
        <Node score="no">
          <CompoundPredicate booleanOperator="or">
            <SimplePredicate field="windy" operator="equal" value="true"/>
            <SimplePredicate field="temperature" operator="greaterOrEqual" value="95"/>
          </CompoundPredicate>
        </Node>
        <Node score="yes">
          <SimpleSetPredicate field="windy" booleanOperator="isIn">
            <Array n="1" type="string">false</Array>
          </SimpleSetPredicate>
        </Node>
      </Node>
    </Node>
  </TreeModel>
</PMML>
"#;

/// A document with a data dictionary but no mining schema; loading it must
/// fail without touching any already-loaded session.
pub const NO_MINING_SCHEMA: &str = r#"<?xml version="1.0"?>
<PMML xmlns="http://www.dmg.org/PMML-4_2" version="4.2">
  <DataDictionary numberOfFields="1">
    <DataField name="x" optype="categorical" dataType="string"/>
  </DataDictionary>
</PMML>
"#;

pub fn write_model(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write model fixture");
    path
}
