//! Static snapshot of the public plugin registry
//!
//! Entry points of the `aiida.calculations` group as listed by the public
//! plugin registry on Tuesday December 4, 13:00:00 UTC. This is fixed data
//! and is never refreshed at runtime; plugins registered later are only
//! known if they are installed locally.

/// Group every snapshot specifier belongs to
pub const SNAPSHOT_GROUP: &str = "aiida.calculations";

/// `name = module:Class` specifiers, in registry order
pub const REGISTERED_CALCULATION_ENTRY_POINTS: &[&str] = &[
    "ase.ase = aiida_ase.calculations.ase:AseCalculation",
    "castep.bs = aiida_castep.calculations.castep:CastepBSCalculation",
    "castep.castep = aiida_castep.calculations.castep:CastepCalculation",
    "castep.pot1d = aiida_castep.calculations.castep:Pot1dCalculation",
    "castep.spec = aiida_castep.calculations.castep:CastepSpectralCalculation",
    "castep.ts = aiida_castep.calculations.castep:CastepTSCalculation",
    "codtools.cifcellcontents = aiida_codtools.calculations.cifcellcontents:CifcellcontentsCalculation",
    "codtools.cifcodcheck = aiida_codtools.calculations.cifcodcheck:CifcodcheckCalculation",
    "codtools.cifcoddeposit = aiida_codtools.calculations.cifcoddeposit:CifcoddepositCalculation",
    "codtools.cifcodnumbers = aiida_codtools.calculations.cifcodnumbers:CifcodnumbersCalculation",
    "codtools.ciffilter = aiida_codtools.calculations.ciffilter:CiffilterCalculation",
    "codtools.cifsplitprimitive = aiida_codtools.calculations.cifsplitprimitive:CifsplitprimitiveCalculation",
    "cp2k = aiida_cp2k.calculations:Cp2kCalculation",
    "crystal17.basic = aiida_crystal17.calculations.cry_basic:CryBasicCalculation",
    "crystal17.immigrant = aiida_crystal17.calculations.cry_main_immigrant:CryMainImmigrantCalculation",
    "crystal17.main = aiida_crystal17.calculations.cry_main:CryMainCalculation",
    "ddec = aiida_ddec.calculations:DdecCalculation",
    "diff = aiida_diff.calculations:DiffCalculation",
    "dynaphopy = aiida_lammps.calculations.dynaphopy: DynaphopyCalculation",
    "gollum.gollum = aiida_gollum.calculations.gollum:GollumCalculation",
    "gudhi.rdm = aiida_gudhi.calculations.rips:RipsDistanceMatrixCalculation",
    "kkr.kkr = aiida_kkr.calculations.kkr:KkrCalculation",
    "kkr.kkrimp = aiida_kkr.calculations.kkrimp:KkrimpCalculation",
    "kkr.kkrimporter = aiida_kkr.calculations.kkrimporter:KkrImporterCalculation",
    "kkr.voro = aiida_kkr.calculations.voro:VoronoiCalculation",
    "lammps.combinate = aiida_lammps.calculations.lammps.combinate:CombinateCalculation",
    "lammps.force = aiida_lammps.calculations.lammps.force:ForceCalculation",
    "lammps.md = aiida_lammps.calculations.lammps.md:MdCalculation",
    "lammps.optimize = aiida_lammps.calculations.lammps.optimize:OptimizeCalculation",
    "nwchem.basic = aiida_nwchem.calculations.basic:BasicCalculation",
    "nwchem.pymatgen = aiida_nwchem.calculations.nwcpymatgen:NwcpymatgenCalculation",
    "phonopy.phono3py = aiida_phonopy.calculations.phonopy.phono3py: Phono3pyCalculation",
    "phonopy.phonopy = aiida_phonopy.calculations.phonopy.phonopy: PhonopyCalculation",
    "phtools.dmatrix = aiida_phtools.calculations.distance_matrix:DistanceMatrixCalculation",
    "phtools.surface = aiida_phtools.calculations.pore_surface:PoreSurfaceCalculation",
    "qeq.eqeq = aiida_qeq.calculations.eqeq:EQeqCalculation",
    "qeq.qeq = aiida_qeq.calculations.qeq:QeqCalculation",
    "quantumespresso.cp = aiida_quantumespresso.calculations.cp:CpCalculation",
    "quantumespresso.dos = aiida_quantumespresso.calculations.dos:DosCalculation",
    "quantumespresso.hp = aiida_quantumespresso_hp.calculations.hp:HpCalculation",
    "quantumespresso.matdyn = aiida_quantumespresso.calculations.matdyn:MatdynCalculation",
    "quantumespresso.namelists = aiida_quantumespresso.calculations.namelists:NamelistsCalculation",
    "quantumespresso.neb = aiida_quantumespresso.calculations.neb:NebCalculation",
    "quantumespresso.ph = aiida_quantumespresso.calculations.ph:PhCalculation",
    "quantumespresso.pp = aiida_quantumespresso.calculations.pp:PpCalculation",
    "quantumespresso.projwfc = aiida_quantumespresso.calculations.projwfc:ProjwfcCalculation",
    "quantumespresso.pw = aiida_quantumespresso.calculations.pw:PwCalculation",
    "quantumespresso.pw2wannier90 = aiida_quantumespresso.calculations.pw2wannier90:Pw2wannier90Calculation",
    "quantumespresso.pwimmigrant = aiida_quantumespresso.calculations.pwimmigrant:PwimmigrantCalculation",
    "quantumespresso.q2r = aiida_quantumespresso.calculations.q2r:Q2rCalculation",
    "raspa = aiida_raspa.calculations:RaspaCalculation",
    "siesta.siesta = aiida_siesta.calculations.siesta:SiestaCalculation",
    "siesta.stm = aiida_siesta.calculations.stm:STMCalculation",
    "vasp.vasp = aiida_vasp.calcs.vasp:VaspCalculation",
    "vasp.vasp2w90 = aiida_vasp.calcs.vasp2w90:Vasp2w90Calculation",
    "wannier90.wannier90 = aiida_wannier90.calculations:Wannier90Calculation",
    "yambo.yambo =  aiida_yambo.calculations.gw:YamboCalculation",
    "zeopp.network = aiida_zeopp.calculations.network:NetworkCalculation",
];
