//! Core glue-layer plugin
//!
//! Renders the eight core files with their fixed include and internal
//! reference lists. Internal references point at other generated files and
//! become prefixed includes when the sink writes to disk.

use super::insert_file;
use crate::config::Config;
use crate::gen::{FileMap, FileRep, GenResult, Plugin, Template};
use crate::templates::{api, codes, data, grader, opera};

pub struct InternalPlugin;

impl InternalPlugin {
    fn render(
        map: &mut FileMap,
        config: &Config,
        template: &Template,
        includes: Vec<String>,
        internal_refs: Vec<String>,
    ) -> GenResult<()> {
        let text = template.render(config.root())?;
        insert_file(
            map,
            config,
            template.fpath(),
            FileRep::new(text, includes, internal_refs),
        );
        Ok(())
    }
}

impl Plugin for InternalPlugin {
    fn plugin_id(&self) -> &'static str {
        "INTERNAL"
    }

    fn process(&self, mut generated: FileMap, config: &Config) -> GenResult<FileMap> {
        let pointers = config.pointer_types();

        let codes_header = codes::header()?;
        let codes_hpp = codes_header.fpath();
        let api_header = api::header(&pointers)?;
        let api_hpp = api_header.fpath();
        let grader_header = grader::header()?;
        let grader_hpp = grader_header.fpath();

        Self::render(
            &mut generated,
            config,
            &api_header,
            vec!["\"ade/ade.hpp\"".to_string()],
            vec![],
        )?;
        Self::render(
            &mut generated,
            config,
            &api::source(&pointers)?,
            vec![],
            vec![codes_hpp.clone(), api_hpp.clone()],
        )?;
        Self::render(
            &mut generated,
            config,
            &codes_header,
            vec!["<string>".to_string()],
            vec![],
        )?;
        Self::render(
            &mut generated,
            config,
            &codes::source()?,
            vec!["<unordered_map>".to_string(), "\"logs/logs.hpp\"".to_string()],
            vec![codes_hpp.clone()],
        )?;
        Self::render(
            &mut generated,
            config,
            &data::header()?,
            vec![],
            vec![codes_hpp.clone()],
        )?;
        Self::render(
            &mut generated,
            config,
            &grader_header,
            vec!["\"ade/ade.hpp\"".to_string()],
            vec![codes_hpp.clone()],
        )?;
        Self::render(
            &mut generated,
            config,
            &grader::source()?,
            vec![],
            vec![api_hpp, grader_hpp],
        )?;
        Self::render(
            &mut generated,
            config,
            &opera::header()?,
            vec!["\"ade/functor.hpp\"".to_string()],
            vec![codes_hpp],
        )?;

        Ok(generated)
    }
}
